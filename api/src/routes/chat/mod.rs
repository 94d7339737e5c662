pub mod chat_response;
pub mod chat_route;
