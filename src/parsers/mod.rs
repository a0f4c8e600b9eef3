mod dom;

pub mod description;
pub mod experience;
pub mod skills;
