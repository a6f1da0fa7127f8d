//! Utility functions shared by the feed model and the CLI.
//!
//! - **Dates**: locale-independent RFC 822 formatting for `pubDate` and
//!   `lastBuildDate`
//! - **Files**: atomic write of a rendered feed
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use rssforge::util::format_date;
//!
//! let date = NaiveDate::from_ymd_opt(2014, 12, 1)
//!     .unwrap()
//!     .and_hms_opt(10, 22, 15)
//!     .unwrap();
//! assert_eq!(
//!     format_date(Some(&date)).as_deref(),
//!     Some("Mon, 01 Dec 2014 10:22:15 GMT")
//! );
//! ```

mod date;
mod fs;

pub use date::{format_date, rfc822};
pub use fs::write_atomic;
