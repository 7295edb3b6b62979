//! In-memory device and favorite store.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use devicehub_core::query::{DeviceQuery, QueryArg};
use devicehub_core::types::Timestamp;
use devicehub_db::models::device::{CreateDevice, Device, MetaColumn, UpdateDevice};
use devicehub_db::store::{DeviceStore, FavoriteStore};
use sqlx::error::{DatabaseError, ErrorKind};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    devices: Vec<Device>,
    /// `(user_id, device_id, insertion sequence)`.
    favorites: Vec<(String, String, u64)>,
    next_seq: u64,
    last_created: Option<Timestamp>,
}

/// In-memory implementation of [`DeviceStore`] and [`FavoriteStore`].
///
/// Listing queries are answered by interpreting the SQL that
/// `build_device_query` produced, binding `$n` to `args[n - 1]`, so a test
/// against this store also checks that placeholders line up with arguments.
///
/// - `query_calls` counts `query_devices` invocations.
/// - `fail_queries` makes every store call return an error.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
    query_calls: Arc<AtomicUsize>,
    fail: Arc<RwLock<bool>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("query_calls", &self.query_calls())
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listing queries executed so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent store call fail (or succeed again).
    pub async fn fail_queries(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Number of favorite rows, across all users.
    pub async fn favorite_count(&self) -> usize {
        self.state.read().await.favorites.len()
    }

    /// Insert a device directly, bypassing validation.
    pub async fn seed(&self, owner_id: &str, input: CreateDevice) -> Device {
        let mut state = self.state.write().await;
        insert(&mut state, owner_id, &input)
    }

    async fn check_failure(&self) -> Result<(), sqlx::Error> {
        if *self.fail.read().await {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn insert(state: &mut State, owner_id: &str, input: &CreateDevice) -> Device {
    // Strictly increasing so "recent" ordering is deterministic.
    let mut now = Utc::now();
    if let Some(last) = state.last_created {
        if now <= last {
            now = last + chrono::Duration::microseconds(1);
        }
    }
    state.last_created = Some(now);

    let device = Device {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name.clone(),
        description: input.description.clone(),
        category: input.category.clone(),
        price_per_day: input.price_per_day,
        available: input.available,
        image_url: input.image_url.clone(),
        owner_id: owner_id.to_string(),
        city: input.city.clone(),
        region: input.region.clone(),
        created_at: Some(now),
        updated_at: Some(now),
    };
    state.devices.push(device.clone());
    device
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn query_devices(&self, query: &DeviceQuery) -> Result<Vec<Device>, sqlx::Error> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;

        let plan = QueryPlan::parse(query).map_err(sqlx::Error::Protocol)?;
        let state = self.state.read().await;
        Ok(plan.execute(&state.devices))
    }

    async fn insert_device(
        &self,
        owner_id: &str,
        input: &CreateDevice,
    ) -> Result<Device, sqlx::Error> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        Ok(insert(&mut state, owner_id, input))
    }

    async fn find_device(&self, id: &str) -> Result<Option<Device>, sqlx::Error> {
        self.check_failure().await?;
        let state = self.state.read().await;
        Ok(state.devices.iter().find(|d| d.id == id).cloned())
    }

    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        input: &UpdateDevice,
    ) -> Result<Option<Device>, sqlx::Error> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        let Some(device) = state
            .devices
            .iter_mut()
            .find(|d| d.id == id && d.owner_id == owner_id)
        else {
            return Ok(None);
        };

        device.name = input.name.clone();
        device.description = input.description.clone();
        device.category = input.category.clone();
        device.price_per_day = input.price_per_day;
        device.available = input.available;
        device.image_url = input.image_url.clone();
        device.updated_at = Some(Utc::now());
        Ok(Some(device.clone()))
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<bool, sqlx::Error> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        let before = state.devices.len();
        state
            .devices
            .retain(|d| !(d.id == id && d.owner_id == owner_id));
        let deleted = state.devices.len() < before;
        if deleted {
            state.favorites.retain(|(_, device_id, _)| device_id != id);
        }
        Ok(deleted)
    }

    async fn set_availability_owned(
        &self,
        id: &str,
        owner_id: &str,
        available: bool,
    ) -> Result<Option<Device>, sqlx::Error> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        let Some(device) = state
            .devices
            .iter_mut()
            .find(|d| d.id == id && d.owner_id == owner_id)
        else {
            return Ok(None);
        };

        device.available = available;
        device.updated_at = Some(Utc::now());
        Ok(Some(device.clone()))
    }

    async fn distinct_values(&self, column: MetaColumn) -> Result<Vec<String>, sqlx::Error> {
        self.check_failure().await?;
        let state = self.state.read().await;
        let values: BTreeSet<String> = state
            .devices
            .iter()
            .map(|d| match column {
                MetaColumn::Category => d.category.clone(),
                MetaColumn::City => d.city.clone(),
                MetaColumn::Region => d.region.clone(),
            })
            .filter(|v| !v.is_empty())
            .collect();
        Ok(values.into_iter().collect())
    }

    async fn trending(&self, limit: i64) -> Result<Vec<Device>, sqlx::Error> {
        self.check_failure().await?;
        let state = self.state.read().await;
        let mut ranked: Vec<(usize, &Device)> = state
            .devices
            .iter()
            .map(|d| {
                let count = state
                    .favorites
                    .iter()
                    .filter(|(_, device_id, _)| *device_id == d.id)
                    .count();
                (count, d)
            })
            .collect();
        ranked.sort_by(|(ca, a), (cb, b)| {
            cb.cmp(ca)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(ranked
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check_failure().await
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn add_favorite(&self, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        if !state.devices.iter().any(|d| d.id == device_id) {
            return Err(sqlx::Error::Database(Box::new(ForeignKeyViolation {
                message: format!("device {device_id} is not present in table \"devices\""),
            })));
        }
        if state
            .favorites
            .iter()
            .any(|(u, d, _)| u == user_id && d == device_id)
        {
            return Ok(false);
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .favorites
            .push((user_id.to_string(), device_id.to_string(), seq));
        Ok(true)
    }

    async fn remove_favorite(&self, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        let before = state.favorites.len();
        state
            .favorites
            .retain(|(u, d, _)| !(u == user_id && d == device_id));
        Ok(state.favorites.len() < before)
    }

    async fn favorites_for_user(&self, user_id: &str) -> Result<Vec<Device>, sqlx::Error> {
        self.check_failure().await?;
        let state = self.state.read().await;
        let mut pairs: Vec<&(String, String, u64)> =
            state.favorites.iter().filter(|(u, _, _)| u == user_id).collect();
        pairs.sort_by(|a, b| b.2.cmp(&a.2));
        Ok(pairs
            .into_iter()
            .filter_map(|(_, device_id, _)| state.devices.iter().find(|d| &d.id == device_id))
            .cloned()
            .collect())
    }
}

/// Mirrors the Postgres `23503` error the favorites FK produces.
#[derive(Debug)]
struct ForeignKeyViolation {
    message: String,
}

impl std::fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ForeignKeyViolation {}

impl DatabaseError for ForeignKeyViolation {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23503"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some("favorites_device_id_fkey")
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::ForeignKeyViolation
    }
}

// ---------------------------------------------------------------------------
// SQL interpretation
// ---------------------------------------------------------------------------

enum Predicate {
    Category(String),
    Available(bool),
    MinPrice(f64),
    MaxPrice(f64),
    City(String),
    Region(String),
}

#[derive(Clone, Copy)]
enum Order {
    Recent,
    PriceAsc,
    PriceDesc,
}

struct QueryPlan {
    predicates: Vec<Predicate>,
    order: Order,
    limit: usize,
    offset: usize,
}

impl QueryPlan {
    fn parse(query: &DeviceQuery) -> Result<Self, String> {
        let sql = query.sql.as_str();
        let (head, tail) = sql
            .split_once(" ORDER BY ")
            .ok_or("missing ORDER BY")?;
        let (order_clause, paging) = tail.split_once(" LIMIT ").ok_or("missing LIMIT")?;
        let (limit_ph, offset_ph) = paging.split_once(" OFFSET ").ok_or("missing OFFSET")?;

        let mut predicates = Vec::new();
        if let Some((_, where_clause)) = head.split_once(" WHERE ") {
            for condition in where_clause.split(" AND ") {
                let (lhs, placeholder) = condition
                    .rsplit_once(' ')
                    .ok_or_else(|| format!("bad condition {condition:?}"))?;
                let value = bound_arg(&query.args, placeholder)?;
                let predicate = match (lhs, value) {
                    ("category =", QueryArg::Text(v)) => Predicate::Category(v.clone()),
                    ("available =", QueryArg::Bool(v)) => Predicate::Available(*v),
                    ("price_per_day >=", QueryArg::Float(v)) => Predicate::MinPrice(*v),
                    ("price_per_day <=", QueryArg::Float(v)) => Predicate::MaxPrice(*v),
                    ("city ILIKE", QueryArg::Text(v)) => Predicate::City(unpattern(v)),
                    ("region ILIKE", QueryArg::Text(v)) => Predicate::Region(unpattern(v)),
                    _ => return Err(format!("unsupported condition {condition:?}")),
                };
                predicates.push(predicate);
            }
        }

        let order = if order_clause.starts_with("price_per_day ASC") {
            Order::PriceAsc
        } else if order_clause.starts_with("price_per_day DESC") {
            Order::PriceDesc
        } else {
            Order::Recent
        };

        let as_usize = |value: &QueryArg| match value {
            QueryArg::Int(n) => Ok(usize::try_from(*n).unwrap_or(0)),
            other => Err(format!("expected integer, got {other:?}")),
        };

        Ok(Self {
            predicates,
            order,
            limit: as_usize(bound_arg(&query.args, limit_ph)?)?,
            offset: as_usize(bound_arg(&query.args, offset_ph)?)?,
        })
    }

    fn execute(&self, devices: &[Device]) -> Vec<Device> {
        let mut rows: Vec<&Device> = devices
            .iter()
            .filter(|d| self.predicates.iter().all(|p| p.matches(d)))
            .collect();

        match self.order {
            Order::Recent => rows.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            Order::PriceAsc => rows.sort_by(|a, b| {
                a.price_per_day
                    .total_cmp(&b.price_per_day)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            Order::PriceDesc => rows.sort_by(|a, b| {
                b.price_per_day
                    .total_cmp(&a.price_per_day)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }

        rows.into_iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect()
    }
}

impl Predicate {
    fn matches(&self, device: &Device) -> bool {
        match self {
            Predicate::Category(v) => device.category == *v,
            Predicate::Available(v) => device.available == *v,
            Predicate::MinPrice(v) => device.price_per_day >= *v,
            Predicate::MaxPrice(v) => device.price_per_day <= *v,
            Predicate::City(v) => contains_ci(&device.city, v),
            Predicate::Region(v) => contains_ci(&device.region, v),
        }
    }
}

/// Resolve a `$n` placeholder to its 1-based argument.
fn bound_arg<'q>(args: &'q [QueryArg], placeholder: &str) -> Result<&'q QueryArg, String> {
    let n: usize = placeholder
        .trim()
        .strip_prefix('$')
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| format!("bad placeholder {placeholder:?}"))?;
    n.checked_sub(1)
        .and_then(|i| args.get(i))
        .ok_or_else(|| format!("placeholder ${n} has no argument"))
}

/// Inverse of `contains_pattern`: drop the `%` wrapper and the escapes.
fn unpattern(pattern: &str) -> String {
    let inner = pattern
        .strip_prefix('%')
        .and_then(|p| p.strip_suffix('%'))
        .unwrap_or(pattern);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
