// Composition root for the attendance tracker.
//
// Responsibilities
// - Read config from the environment.
// - Instantiate the document storage and open the data store.
// - Wire the store into the HTTP router.

pub mod config;
pub mod http;
pub mod state;
