mod hydration;
mod partition;
mod test_helpers;
mod types;
