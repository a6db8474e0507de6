use crate::error::FormError;
use crate::form::FormState;
use crate::model::{CreateListingRequest, FieldId, InputValue};
use crate::orchestrator::FormEvent;
use crate::session::CurrentUser;
use std::collections::HashMap;
use std::path::PathBuf;

/// One focusable row of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Field(FieldId),
    Files,
    Images,
    Submit,
}

pub fn rows() -> Vec<Row> {
    FieldId::ALL
        .iter()
        .copied()
        .map(Row::Field)
        .chain([Row::Files, Row::Images, Row::Submit])
        .collect()
}

pub struct UiState {
    pub form: FormState,
    pub user: CurrentUser,
    pub base_url: String,
    pub focus: usize,
    // Edit buffers for text and numeric fields; numbers are committed only when they parse.
    pub buffers: HashMap<FieldId, String>,
    // Pending parse errors, one per field whose buffer does not parse.
    pub input_errors: HashMap<FieldId, FormError>,
    pub files_input: String,
    pub image_selected: usize,
    pub show_help: bool,
    pub info: String,
}

impl UiState {
    pub fn new(user: CurrentUser, base_url: String) -> Self {
        let form = FormState::new();
        let buffers = FieldId::ALL
            .iter()
            .filter(|f| !f.is_checkbox())
            .map(|f| (*f, form.draft().text(*f)))
            .collect();
        Self {
            form,
            user,
            base_url,
            focus: 0,
            buffers,
            input_errors: HashMap::new(),
            files_input: String::new(),
            image_selected: 0,
            show_help: false,
            info: String::new(),
        }
    }

    pub fn focused(&self) -> Row {
        let rows = rows();
        rows[self.focus.min(rows.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % rows().len();
    }

    pub fn focus_prev(&mut self) {
        let n = rows().len();
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn buffer(&self, field: FieldId) -> &str {
        self.buffers.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Typed character on the focused row. Returns false when the row takes no text.
    pub fn type_char(&mut self, c: char) -> bool {
        match self.focused() {
            Row::Field(f) if !f.is_checkbox() => {
                self.buffers.entry(f).or_default().push(c);
                self.commit(f);
                true
            }
            Row::Files => {
                self.files_input.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        match self.focused() {
            Row::Field(f) if !f.is_checkbox() => {
                if let Some(b) = self.buffers.get_mut(&f) {
                    b.pop();
                }
                self.commit(f);
            }
            Row::Files => {
                self.files_input.pop();
            }
            _ => {}
        }
    }

    fn commit(&mut self, field: FieldId) {
        let raw = self.buffer(field).to_string();
        match self.form.change(field, InputValue::Text(raw)) {
            Ok(()) => {
                self.input_errors.remove(&field);
            }
            Err(e) => {
                self.input_errors.insert(field, e);
            }
        }
    }

    /// Pending input errors in form order.
    pub fn pending_errors(&self) -> impl Iterator<Item = &FormError> {
        FieldId::ALL
            .iter()
            .filter_map(|f| self.input_errors.get(f))
    }

    /// Fill the form from values given on the command line.
    pub fn prefill(&mut self, inputs: Vec<(FieldId, InputValue)>, images: &[PathBuf]) {
        for (field, input) in inputs {
            match input {
                InputValue::Text(text) => {
                    self.buffers.insert(field, text);
                    self.commit(field);
                }
                checked => {
                    if let Err(e) = self.form.change(field, checked) {
                        self.info = e.to_string();
                    }
                }
            }
        }
        self.files_input = images
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
    }

    /// Flip the focused checkbox.
    pub fn toggle(&mut self) {
        if let Row::Field(f) = self.focused() {
            if f.is_checkbox() {
                let checked = !self.form.draft().is_checked(f);
                if let Err(e) = self.form.change(f, InputValue::Checked(checked)) {
                    self.info = e.to_string();
                }
            }
        }
    }

    /// Paths typed into the files row, separated by commas.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.files_input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Start an upload batch. `None` when the trigger is disabled or the precheck failed.
    pub fn request_upload(&mut self) -> Option<Vec<PathBuf>> {
        if !self.form.can_upload() {
            return None;
        }
        let paths = self.selected_paths();
        self.form.begin_upload(paths.len()).ok()?;
        self.files_input.clear();
        Some(paths)
    }

    /// Start a submission. `None` when disabled, an input is invalid or validation fails.
    pub fn request_submit(&mut self) -> Option<CreateListingRequest> {
        if !self.form.can_submit() {
            return None;
        }
        let first_error = self.pending_errors().next().map(|e| e.to_string());
        if let Some(e) = first_error {
            self.info = format!("Fix the form first: {e}");
            return None;
        }
        self.form.begin_submit(&self.user).ok()
    }

    pub fn select_image(&mut self, delta: isize) {
        let n = self.form.draft().image_urls.len();
        if n == 0 {
            self.image_selected = 0;
            return;
        }
        let next = (self.image_selected as isize + delta).clamp(0, n as isize - 1);
        self.image_selected = next as usize;
    }

    pub fn remove_selected_image(&mut self) {
        self.form.remove_image(self.image_selected);
        self.select_image(0);
    }

    pub fn apply_event(&mut self, ev: FormEvent) {
        match ev {
            FormEvent::UploadFinished(result) => {
                self.form.finish_upload(result);
                self.select_image(0);
            }
            FormEvent::SubmitFinished(result) => {
                if let Ok(route) = self.form.finish_submit(result) {
                    self.info = format!(
                        "Listing created: {}",
                        crate::summary::listing_url(&self.base_url, &route)
                    );
                }
            }
        }
    }

    pub fn listing_url(&self) -> Option<String> {
        self.form
            .navigated()
            .map(|route| crate::summary::listing_url(&self.base_url, route))
    }
}
