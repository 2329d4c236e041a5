pub mod auth_client;
pub mod question_client;
pub mod test_client;
pub mod user_client;

pub use auth_client::AuthClient;
pub use question_client::QuestionClient;
pub use test_client::TestClient;
pub use user_client::UserClient;
