pub mod invitation;
pub mod partnership;
pub mod profile;
