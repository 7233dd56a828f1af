pub mod cli_args;
mod envelope;
pub mod error;
mod extractor;
mod middleware;
mod route;
pub mod server;
mod state;
pub mod store;

#[cfg(test)]
mod test;
