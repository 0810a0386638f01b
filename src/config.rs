use std::env;
use std::str::FromStr;

use crate::models::{BookingStatus, SummaryMembership, SummaryPolicy};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub request_timeout_secs: u64,
    pub summary: SummaryPolicy,
    pub audit_queue_capacity: usize,
    pub audit_max_retries: u32,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: "hotel.db".to_string(),
            admin_token: "changeme".to_string(),
            request_timeout_secs: 30,
            summary: SummaryPolicy::default(),
            audit_queue_capacity: 1024,
            audit_max_retries: 3,
            allowed_origins: vec![],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let summary = SummaryPolicy {
            membership: match lookup("SUMMARY_MEMBERSHIP") {
                Some(raw) => SummaryMembership::parse(&raw).unwrap_or_else(|| {
                    tracing::warn!(value = %raw, "invalid SUMMARY_MEMBERSHIP, using default");
                    defaults.summary.membership
                }),
                None => defaults.summary.membership,
            },
            revenue_statuses: match lookup("SUMMARY_REVENUE_STATUSES") {
                Some(raw) => parse_statuses(&raw).unwrap_or_else(|| {
                    tracing::warn!(value = %raw, "invalid SUMMARY_REVENUE_STATUSES, using default");
                    defaults.summary.revenue_statuses.clone()
                }),
                None => defaults.summary.revenue_statuses.clone(),
            },
            page_size: parsed(&lookup, "SUMMARY_PAGE_SIZE", defaults.summary.page_size),
        };

        Self {
            port: parsed(&lookup, "PORT", defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            admin_token: lookup("ADMIN_TOKEN").unwrap_or(defaults.admin_token),
            request_timeout_secs: parsed(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            summary,
            audit_queue_capacity: parsed(
                &lookup,
                "AUDIT_QUEUE_CAPACITY",
                defaults.audit_queue_capacity,
            ),
            audit_max_retries: parsed(&lookup, "AUDIT_MAX_RETRIES", defaults.audit_max_retries),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable setting, using default");
            default
        }),
        None => default,
    }
}

fn parse_statuses(raw: &str) -> Option<Vec<BookingStatus>> {
    let statuses: Option<Vec<_>> = raw
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(BookingStatus::parse)
        .collect();
    statuses.filter(|s| !s.is_empty())
}
