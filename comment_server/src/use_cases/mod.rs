pub mod comments;
pub mod login;
pub mod logout;
pub mod password;
pub mod register;
pub mod replies;
pub mod verify_token;

#[cfg(test)]
pub(crate) mod test_support;
