//! Parameterized SQL for device listings.
//!
//! [`build_device_query`] turns a [`DeviceFilter`] into a query template and
//! an ordered argument list. Only predicates for fields that are present are
//! emitted, always in the same order:
//!
//! 1. `category = $n`
//! 2. `available = $n`
//! 3. `price_per_day >= $n`
//! 4. `price_per_day <= $n`
//! 5. `city ILIKE $n`
//! 6. `region ILIKE $n`
//!
//! followed by `ORDER BY` for the sort mode and `LIMIT $n OFFSET $n+1`. User
//! input only ever travels in [`QueryArg`]s.

use crate::filter::{DeviceFilter, SortMode};

/// Column list for `devices` queries.
pub const DEVICE_COLUMNS: &str = "\
    id, name, description, category, price_per_day, available, \
    image_url, owner_id, city, region, created_at, updated_at";

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    Bool(bool),
    Float(f64),
    Int(i64),
}

/// A listing query ready to be bound and executed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceQuery {
    pub sql: String,
    /// `args[i]` binds to placeholder `$(i + 1)`.
    pub args: Vec<QueryArg>,
}

/// Build the listing query for a filter.
pub fn build_device_query(filter: &DeviceFilter) -> DeviceQuery {
    let mut conditions: Vec<String> = Vec::new();
    let mut args: Vec<QueryArg> = Vec::new();

    let mut push = |predicate: &str, arg: QueryArg| {
        args.push(arg);
        conditions.push(format!("{predicate} ${}", args.len()));
    };

    if let Some(category) = &filter.category {
        push("category =", QueryArg::Text(category.clone()));
    }
    if let Some(available) = filter.available {
        push("available =", QueryArg::Bool(available));
    }
    if let Some(min_price) = filter.min_price {
        push("price_per_day >=", QueryArg::Float(min_price));
    }
    if let Some(max_price) = filter.max_price {
        push("price_per_day <=", QueryArg::Float(max_price));
    }
    if let Some(city) = &filter.city {
        push("city ILIKE", QueryArg::Text(contains_pattern(city)));
    }
    if let Some(region) = &filter.region {
        push("region ILIKE", QueryArg::Text(contains_pattern(region)));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    args.push(QueryArg::Int(filter.effective_page_size()));
    let limit_idx = args.len();
    args.push(QueryArg::Int(filter.offset()));
    let offset_idx = args.len();

    let sql = format!(
        "SELECT {DEVICE_COLUMNS} FROM devices{where_clause} \
         ORDER BY {order} \
         LIMIT ${limit_idx} OFFSET ${offset_idx}",
        order = order_by(filter.sort),
    );

    DeviceQuery { sql, args }
}

/// `ORDER BY` body for a sort mode. `id` is the final tie-breaker so pages
/// never overlap when the primary key has duplicates.
pub fn order_by(sort: SortMode) -> &'static str {
    match sort {
        SortMode::PriceAsc => "price_per_day ASC, id ASC",
        SortMode::PriceDesc => "price_per_day DESC, id ASC",
        SortMode::Recent => "created_at DESC, id ASC",
    }
}

/// Wrap a value as an `ILIKE` substring pattern, escaping `\`, `%` and `_`
/// so they match literally.
pub fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
