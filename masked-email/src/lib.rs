pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod masked_email;
pub mod matcher;
pub mod selection;

pub use client::FastmailClient;
pub use config::Config;
pub use domain::{
    domains_equal, host_from_origin, is_subdomain, looks_like_email_address, normalize_email_input,
    normalize_origin, prepare_domain_input, DomainError, DomainInput, Origin,
};
pub use error::ClientError;
pub use masked_email::{MaskedEmail, MaskedEmailState};
pub use matcher::{matches_domain, matches_free_text, matches_subdomain, partition_for_listing, Listing};
pub use selection::select_preferred;

// Re-export protocol types for convenience
pub use jmap_client::{HttpError, JmapError, MethodError};
