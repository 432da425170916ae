pub(crate) mod entities;
pub(crate) mod fetch;
pub(crate) mod score;
pub(crate) mod session;
pub(crate) mod shitsumon;

#[cfg(test)]
pub(crate) mod test_server;
