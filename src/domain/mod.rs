pub mod aggregate;
pub mod body;
pub mod commit;
pub mod extract;
pub mod issue;
pub mod pull_request;
pub mod table;
