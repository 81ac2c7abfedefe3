use tracing::debug;

use shared_resource::FetchError;

use crate::services::controller::DashboardController;
use crate::services::view_state::{Action, Effect};

impl DashboardController {
    /// Marks a psychologist inactive upstream and patches the loaded list in
    /// place. Consultation counts are left as they were.
    pub async fn deactivate(&self, psychologist_id: &str) -> Result<(), FetchError> {
        let effect = self.dispatch(Action::DeactivateRequested(psychologist_id.to_string())).await;
        let Effect::Deactivate { psychologist_id, session } = effect else {
            return Ok(());
        };

        debug!("Inactivating psychologist {}", psychologist_id);
        let result = self.client.inactivate_psychologist(&psychologist_id).await;

        self.dispatch(Action::DeactivateSettled {
            psychologist_id,
            session,
            result: result.clone(),
        })
        .await;
        result
    }
}
