#[cfg(test)]
pub mod memory;
pub mod mysql;
