pub mod mailer;

pub use mailer::MailerPort;
