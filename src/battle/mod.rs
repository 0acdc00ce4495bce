pub mod ai;
pub mod encounter;
pub mod info;
pub mod state;

#[cfg(test)]
pub(crate) mod tests;
