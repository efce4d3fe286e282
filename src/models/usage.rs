//! Usage aggregates for the dashboard and metrics pages.
//!
//! Everything here is derived from the application and key collections on
//! each page load; nothing is persisted or cached between visits.

use serde::Serialize;
use std::cmp::Ordering;

use crate::models::{ApiKey, Application};

/// Estimated price of a single proxied request (USD).
pub const UNIT_PRICE_PER_REQUEST: f64 = 0.0002;

/// Estimated cost of `requests` requests.
pub fn estimated_cost(requests: u64) -> f64 {
    requests as f64 * UNIT_PRICE_PER_REQUEST
}

/// Per-application usage aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct AppUsage {
    pub app: Application,
    pub requests: u64,
    pub cost: f64,
    pub key_count: usize,
    pub active_keys: usize,
    pub disabled_keys: usize,
}

impl AppUsage {
    /// Reduce an application's keys to its aggregate.
    pub fn from_keys(app: Application, keys: &[ApiKey]) -> Self {
        let requests = keys.iter().map(ApiKey::requests).sum();
        let active_keys = keys.iter().filter(|k| k.is_active).count();

        Self {
            app,
            requests,
            cost: estimated_cost(requests),
            key_count: keys.len(),
            active_keys,
            disabled_keys: keys.len() - active_keys,
        }
    }
}

/// A key annotated with the name of its owning application.
#[derive(Debug, Clone, Serialize)]
pub struct KeyUsage {
    pub key: ApiKey,
    pub app_name: String,
}

/// All applications with their keys, in the order the backend listed them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageReport {
    pub apps: Vec<AppUsage>,
    pub keys: Vec<KeyUsage>,
}

impl UsageReport {
    /// Build the report from `(application, keys)` pairs.
    pub fn from_collections(collections: Vec<(Application, Vec<ApiKey>)>) -> Self {
        let mut report = Self::default();

        for (app, keys) in collections {
            let usage = AppUsage::from_keys(app, &keys);
            report.keys.extend(keys.into_iter().map(|key| KeyUsage {
                key,
                app_name: usage.app.name.clone(),
            }));
            report.apps.push(usage);
        }

        report
    }

    pub fn total_apps(&self) -> usize {
        self.apps.len()
    }

    pub fn total_requests(&self) -> u64 {
        self.apps.iter().map(|a| a.requests).sum()
    }

    pub fn total_keys(&self) -> usize {
        self.apps.iter().map(|a| a.key_count).sum()
    }

    pub fn active_keys(&self) -> usize {
        self.apps.iter().map(|a| a.active_keys).sum()
    }

    pub fn disabled_keys(&self) -> usize {
        self.total_keys() - self.active_keys()
    }

    pub fn estimated_cost(&self) -> f64 {
        estimated_cost(self.total_requests())
    }

    /// Average requests per application, rounded; 0 with no applications.
    pub fn avg_requests_per_app(&self) -> u64 {
        if self.apps.is_empty() {
            return 0;
        }
        (self.total_requests() as f64 / self.apps.len() as f64).round() as u64
    }

    /// Share of keys that are active, in `[0, 1]`.
    pub fn active_key_ratio(&self) -> f64 {
        match self.total_keys() {
            0 => 0.0,
            total => self.active_keys() as f64 / total as f64,
        }
    }

    pub fn top_by_usage(&self, n: usize) -> Vec<&AppUsage> {
        top_n(&self.apps, n, |a| a.requests)
    }

    pub fn top_by_cost(&self, n: usize) -> Vec<&AppUsage> {
        top_n_by(&self.apps, n, |a, b| b.cost.total_cmp(&a.cost))
    }

    pub fn top_by_key_count(&self, n: usize) -> Vec<&AppUsage> {
        top_n(&self.apps, n, |a| a.key_count)
    }

    /// Applications ranked by disabled keys, skipping those with none.
    pub fn top_by_disabled(&self, n: usize) -> Vec<&AppUsage> {
        let mut ranked = top_n(&self.apps, self.apps.len(), |a| a.disabled_keys);
        ranked.retain(|a| a.disabled_keys > 0);
        ranked.truncate(n);
        ranked
    }

    /// Keys across all applications ranked by request count.
    pub fn top_keys(&self, n: usize) -> Vec<&KeyUsage> {
        top_n(&self.keys, n, |k| k.key.requests())
    }
}

/// The `n` largest items by `key`, descending.
///
/// The sort is stable, so ties keep the order of `items`.
pub fn top_n<T, K, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    top_n_by(items, n, |a, b| key(b).cmp(&key(a)))
}

fn top_n_by<T, F>(items: &[T], n: usize, compare: F) -> Vec<&T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| compare(a, b));
    ranked.truncate(n);
    ranked
}
