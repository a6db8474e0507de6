use crate::error::FormError;
use serde::{Deserialize, Serialize};

/// Maximum number of images a single listing may carry.
pub const MAX_IMAGES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    #[default]
    Rent,
}

impl ListingType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::Sale => "sale",
            ListingType::Rent => "rent",
        }
    }
}

impl std::str::FromStr for ListingType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" | "sell" => Ok(ListingType::Sale),
            "rent" => Ok(ListingType::Rent),
            _ => Err(FormError::InvalidInput { label: "Type" }),
        }
    }
}

/// The listing being composed by the form. Lives only as long as the form does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub image_urls: Vec<String>,
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: f64,
    pub discount_price: f64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            image_urls: Vec::new(),
            name: String::new(),
            description: String::new(),
            address: String::new(),
            listing_type: ListingType::Rent,
            bedrooms: 1,
            bathrooms: 1,
            regular_price: 50.0,
            discount_price: 0.0,
            offer: false,
            parking: false,
            furnished: false,
        }
    }
}

/// Every editable input of the form. Images and `userRef` are not edited through fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Description,
    Address,
    Sale,
    Rent,
    Parking,
    Furnished,
    Offer,
    Bedrooms,
    Bathrooms,
    RegularPrice,
    DiscountPrice,
}

impl FieldId {
    pub const ALL: [FieldId; 12] = [
        FieldId::Name,
        FieldId::Description,
        FieldId::Address,
        FieldId::Sale,
        FieldId::Rent,
        FieldId::Parking,
        FieldId::Furnished,
        FieldId::Offer,
        FieldId::Bedrooms,
        FieldId::Bathrooms,
        FieldId::RegularPrice,
        FieldId::DiscountPrice,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Name => "Name",
            FieldId::Description => "Description",
            FieldId::Address => "Address",
            FieldId::Sale => "Sell",
            FieldId::Rent => "Rent",
            FieldId::Parking => "Parking",
            FieldId::Furnished => "Furnished",
            FieldId::Offer => "Offer",
            FieldId::Bedrooms => "Bedrooms",
            FieldId::Bathrooms => "Bathrooms",
            FieldId::RegularPrice => "Regular price",
            FieldId::DiscountPrice => "Discount price",
        }
    }

    pub fn is_checkbox(self) -> bool {
        matches!(
            self,
            FieldId::Sale | FieldId::Rent | FieldId::Parking | FieldId::Furnished | FieldId::Offer
        )
    }

    /// Convert raw input into a typed update. Numbers are validated here, not at submit time.
    pub fn parse(self, input: InputValue) -> Result<FieldUpdate, FormError> {
        let label = self.label();
        match (self, input) {
            (FieldId::Name, InputValue::Text(s)) => Ok(FieldUpdate::Name(s)),
            (FieldId::Description, InputValue::Text(s)) => Ok(FieldUpdate::Description(s)),
            (FieldId::Address, InputValue::Text(s)) => Ok(FieldUpdate::Address(s)),
            (FieldId::Sale, InputValue::Checked(c)) => Ok(FieldUpdate::Sale(c)),
            (FieldId::Rent, InputValue::Checked(c)) => Ok(FieldUpdate::Rent(c)),
            (FieldId::Parking, InputValue::Checked(c)) => Ok(FieldUpdate::Parking(c)),
            (FieldId::Furnished, InputValue::Checked(c)) => Ok(FieldUpdate::Furnished(c)),
            (FieldId::Offer, InputValue::Checked(c)) => Ok(FieldUpdate::Offer(c)),
            (FieldId::Bedrooms, InputValue::Text(s)) => {
                parse_count(&s, label).map(FieldUpdate::Bedrooms)
            }
            (FieldId::Bathrooms, InputValue::Text(s)) => {
                parse_count(&s, label).map(FieldUpdate::Bathrooms)
            }
            (FieldId::RegularPrice, InputValue::Text(s)) => {
                parse_price(&s, label).map(FieldUpdate::RegularPrice)
            }
            (FieldId::DiscountPrice, InputValue::Text(s)) => {
                parse_price(&s, label).map(FieldUpdate::DiscountPrice)
            }
            _ => Err(FormError::InvalidInput { label }),
        }
    }
}

/// Raw value coming from an input control.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Text(String),
    Checked(bool),
}

/// A validated change to one draft attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Description(String),
    Address(String),
    Sale(bool),
    Rent(bool),
    Parking(bool),
    Furnished(bool),
    Offer(bool),
    Bedrooms(u32),
    Bathrooms(u32),
    RegularPrice(f64),
    DiscountPrice(f64),
}

fn parse_count(raw: &str, label: &'static str) -> Result<u32, FormError> {
    let n: u32 = raw
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidNumber { label })?;
    if n < 1 {
        return Err(FormError::OutOfRange { label });
    }
    Ok(n)
}

fn parse_price(raw: &str, label: &'static str) -> Result<f64, FormError> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidNumber { label })?;
    if !v.is_finite() {
        return Err(FormError::InvalidNumber { label });
    }
    if v < 0.0 {
        return Err(FormError::OutOfRange { label });
    }
    Ok(v)
}

impl ListingDraft {
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(s) => self.name = s,
            FieldUpdate::Description(s) => self.description = s,
            FieldUpdate::Address(s) => self.address = s,
            // Sale and rent behave like a radio pair: checking one selects it,
            // unchecking the selected one keeps the current type.
            FieldUpdate::Sale(true) => self.listing_type = ListingType::Sale,
            FieldUpdate::Rent(true) => self.listing_type = ListingType::Rent,
            FieldUpdate::Sale(false) | FieldUpdate::Rent(false) => {}
            FieldUpdate::Parking(c) => self.parking = c,
            FieldUpdate::Furnished(c) => self.furnished = c,
            FieldUpdate::Offer(c) => self.offer = c,
            FieldUpdate::Bedrooms(n) => self.bedrooms = n,
            FieldUpdate::Bathrooms(n) => self.bathrooms = n,
            FieldUpdate::RegularPrice(v) => self.regular_price = v,
            FieldUpdate::DiscountPrice(v) => self.discount_price = v,
        }
    }

    /// Checkbox state for rendering.
    pub fn is_checked(&self, field: FieldId) -> bool {
        match field {
            FieldId::Sale => self.listing_type == ListingType::Sale,
            FieldId::Rent => self.listing_type == ListingType::Rent,
            FieldId::Parking => self.parking,
            FieldId::Furnished => self.furnished,
            FieldId::Offer => self.offer,
            _ => false,
        }
    }

    /// Current value of a non-checkbox field as text, for rendering and edit buffers.
    pub fn text(&self, field: FieldId) -> String {
        match field {
            FieldId::Name => self.name.clone(),
            FieldId::Description => self.description.clone(),
            FieldId::Address => self.address.clone(),
            FieldId::Bedrooms => self.bedrooms.to_string(),
            FieldId::Bathrooms => self.bathrooms.to_string(),
            FieldId::RegularPrice => self.regular_price.to_string(),
            FieldId::DiscountPrice => self.discount_price.to_string(),
            _ => String::new(),
        }
    }
}

/// Body of `POST /api/listing/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[serde(flatten)]
    pub listing: ListingDraft,
    pub user_ref: String,
}

/// Outcome reported by the backend for a create request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateListingResponse {
    Created { id: String, body: serde_json::Value },
    Rejected { message: String },
}

/// Where the client goes once a listing has been created.
pub fn listing_route(id: &str) -> String {
    format!("/listing/{id}")
}

/// A local image selected for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: bytes::Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<bytes::Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn read(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_and_rent_are_mutually_exclusive() {
        let mut d = ListingDraft::default();
        assert_eq!(d.listing_type, ListingType::Rent);
        d.apply(FieldId::Sale.parse(InputValue::Checked(true)).unwrap());
        assert!(d.is_checked(FieldId::Sale));
        assert!(!d.is_checked(FieldId::Rent));
        d.apply(FieldId::Rent.parse(InputValue::Checked(true)).unwrap());
        assert_eq!(d.listing_type, ListingType::Rent);
        d.apply(FieldId::Rent.parse(InputValue::Checked(false)).unwrap());
        assert_eq!(d.listing_type, ListingType::Rent);
    }

    #[test]
    fn numeric_fields_are_parsed_at_input() {
        assert_eq!(
            FieldId::RegularPrice.parse(InputValue::Text(" 120.5 ".into())),
            Ok(FieldUpdate::RegularPrice(120.5))
        );
        assert_eq!(
            FieldId::Bedrooms.parse(InputValue::Text("3".into())),
            Ok(FieldUpdate::Bedrooms(3))
        );
        let err = FieldId::RegularPrice
            .parse(InputValue::Text("abc".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Regular price must be a number");
        let err = FieldId::Bathrooms
            .parse(InputValue::Text("0".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Bathrooms is out of range");
        assert!(FieldId::DiscountPrice
            .parse(InputValue::Text("-1".into()))
            .is_err());
        assert!(FieldId::DiscountPrice
            .parse(InputValue::Text("NaN".into()))
            .is_err());
    }

    #[test]
    fn input_kind_mismatch_is_rejected() {
        assert_eq!(
            FieldId::Parking.parse(InputValue::Text("yes".into())),
            Err(FormError::InvalidInput { label: "Parking" })
        );
        assert!(FieldId::Name.parse(InputValue::Checked(true)).is_err());
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let req = CreateListingRequest {
            listing: ListingDraft {
                image_urls: vec!["https://img/1.jpg".into()],
                name: "Loft".into(),
                ..Default::default()
            },
            user_ref: "u1".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["imageUrls"][0], "https://img/1.jpg");
        assert_eq!(v["type"], "rent");
        assert_eq!(v["regularPrice"], 50.0);
        assert_eq!(v["discountPrice"], 0.0);
        assert_eq!(v["userRef"], "u1");
        assert_eq!(v["bedrooms"], 1);
        assert_eq!(v["furnished"], false);
    }

    #[test]
    fn listing_type_from_str() {
        assert_eq!("Sale".parse::<ListingType>(), Ok(ListingType::Sale));
        assert_eq!("rent".parse::<ListingType>(), Ok(ListingType::Rent));
        assert!("lease".parse::<ListingType>().is_err());
    }
}
