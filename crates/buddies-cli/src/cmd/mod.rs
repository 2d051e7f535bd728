pub mod init;
pub mod send_emails;
pub mod update_neighbors;
pub mod update_profiles;
pub mod update_statuses;
pub mod voter;
