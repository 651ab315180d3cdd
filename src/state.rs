use crate::data::model::IrisFrame;

// ---------------------------------------------------------------------------
// Pipeline state
// ---------------------------------------------------------------------------

/// Raised by any stage that needs the table when loading did not produce one.
#[derive(Debug, thiserror::Error)]
#[error("dataset not loaded{}", cause_suffix(.0))]
pub struct NotLoaded(pub Option<String>);

fn cause_suffix(cause: &Option<String>) -> String {
    cause.as_deref().map(|m| format!(" ({m})")).unwrap_or_default()
}

/// Everything the stages share, independent of how it is printed.
#[derive(Debug, Default)]
pub struct PipelineState {
    /// Loaded table (None until loading succeeds).
    pub dataset: Option<IrisFrame>,

    /// Diagnostic from a failed load.
    pub status_message: Option<String>,
}

impl PipelineState {
    /// Ingest a freshly loaded table.
    pub fn set_dataset(&mut self, dataset: IrisFrame) {
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Record a load failure and drop any previous table.
    pub fn set_load_error(&mut self, message: String) {
        self.dataset = None;
        self.status_message = Some(message);
    }

    /// The table, or [`NotLoaded`] carrying the load diagnostic.
    pub fn dataset(&self) -> Result<&IrisFrame, NotLoaded> {
        self.dataset
            .as_ref()
            .ok_or_else(|| NotLoaded(self.status_message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_iris;

    #[test]
    fn empty_state_has_no_dataset() {
        let state = PipelineState::default();
        let err = state.dataset().unwrap_err();
        assert_eq!(err.to_string(), "dataset not loaded");
    }

    #[test]
    fn load_error_is_carried_into_not_loaded() {
        let mut state = PipelineState::default();
        state.set_load_error("bad header".to_string());
        let err = state.dataset().unwrap_err();
        assert_eq!(err.to_string(), "dataset not loaded (bad header)");
    }

    #[test]
    fn set_dataset_clears_the_diagnostic() {
        let mut state = PipelineState::default();
        state.set_load_error("bad header".to_string());
        state.set_dataset(load_iris().unwrap());
        assert!(state.status_message.is_none());
        assert_eq!(state.dataset().unwrap().len(), 150);
    }
}
