pub mod deadline;
pub mod parse;
pub mod password;
pub mod validator;
