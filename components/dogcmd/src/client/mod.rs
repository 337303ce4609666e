pub mod client;
pub mod datadog;
pub mod dry_run;

#[cfg(test)]
pub(crate) mod testing;
