pub mod acl_steps;
pub mod matcher_steps;
