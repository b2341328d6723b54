pub mod device;
pub mod loan;

#[cfg(test)]
mod fakes;
