// Conversation phases served by the API
pub mod medical_qa;
pub mod user_info_collection;

// Shared modules
pub mod utils;

use async_trait::async_trait;

use crate::errors::TaskError;

pub use medical_qa::MedicalQaTask;
pub use user_info_collection::UserInfoCollectionTask;

/// One stateless conversation turn: request in, response out.
#[async_trait]
pub trait ChatTask: Send + Sync {
    type Request: Send + 'static;
    type Response: Send;

    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, request: Self::Request) -> Result<Self::Response, TaskError>;
}
