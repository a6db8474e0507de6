//! Text summary builder for CLI output.
//!
//! Formats the draft and the created listing as human-readable lines for text mode.

use crate::model::ListingDraft;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Describe a draft the way the listing page would show it.
pub(crate) fn build_draft_summary(draft: &ListingDraft) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("Name: {}", draft.name));
    lines.push(format!("Address: {}", draft.address));
    if !draft.description.trim().is_empty() {
        lines.push(format!("Description: {}", draft.description));
    }
    lines.push(format!(
        "Type: {} / {} bed / {} bath",
        draft.listing_type.as_str(),
        draft.bedrooms,
        draft.bathrooms
    ));
    if draft.offer {
        lines.push(format!(
            "Price: {} (offer {})",
            draft.regular_price, draft.discount_price
        ));
    } else {
        lines.push(format!("Price: {}", draft.regular_price));
    }
    lines.push(format!(
        "Parking: {}  Furnished: {}  Offer: {}",
        yes_no(draft.parking),
        yes_no(draft.furnished),
        yes_no(draft.offer)
    ));
    lines.push(format!("Images: {}", draft.image_urls.len()));
    for (i, url) in draft.image_urls.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, url));
    }

    TextSummary { lines }
}

/// Full URL of a listing route on the site.
pub(crate) fn listing_url(base_url: &str, route: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListingType;

    #[test]
    fn summary_lists_images_and_offer_price() {
        let draft = ListingDraft {
            name: "Loft".into(),
            address: "9 Mill St".into(),
            listing_type: ListingType::Sale,
            bedrooms: 2,
            regular_price: 300.0,
            discount_price: 250.0,
            offer: true,
            image_urls: vec!["https://img/a.jpg".into(), "https://img/b.jpg".into()],
            ..Default::default()
        };
        let s = build_draft_summary(&draft);
        assert!(s.lines.contains(&"Type: sale / 2 bed / 1 bath".to_string()));
        assert!(s.lines.contains(&"Price: 300 (offer 250)".to_string()));
        assert!(s.lines.contains(&"  2. https://img/b.jpg".to_string()));
        assert!(!s.lines.iter().any(|l| l.starts_with("Description")));
    }

    #[test]
    fn listing_url_joins_route() {
        assert_eq!(
            listing_url("http://localhost:3000/", "/listing/abc123"),
            "http://localhost:3000/listing/abc123"
        );
    }
}
