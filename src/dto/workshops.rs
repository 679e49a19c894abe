/// Multipart field names expected by `POST /seller/workshops`.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const LOCATION: &str = "location";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const MAX_PARTICIPANTS: &str = "max_participants";
    pub const STATUS: &str = "status";
    pub const REGISTRATION_LINK: &str = "registration_link";
    pub const IMAGE: &str = "image";
}
