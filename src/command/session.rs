use crate::backend::Method;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    selected_method: Option<Method>,
    last_inbound_id: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_method(&self) -> Option<Method> {
        self.selected_method
    }

    pub fn select_method(&mut self, method: Method) {
        self.selected_method = Some(method);
    }

    pub fn is_duplicate(&self, id: &str) -> bool {
        self.last_inbound_id.as_deref() == Some(id)
    }

    pub fn mark_processed(&mut self, id: &str) {
        self.last_inbound_id = Some(id.to_string());
    }
}
