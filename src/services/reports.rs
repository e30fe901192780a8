use crate::{
    db::DbPool,
    entities::{menu_item, order, order_item, payment},
    errors::ServiceError,
};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, LoaderTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// `today`, `week` or `month`; takes precedence over `from`/`to`
    pub period: Option<String>,
    /// First day, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Last day (inclusive), `YYYY-MM-DD`
    pub to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub orders: u64,
    #[schema(value_type = f64)]
    pub revenue: Decimal,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DaySummary {
    pub orders: u64,
    #[schema(value_type = f64)]
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_orders: u64,
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
    pub daily: BTreeMap<NaiveDate, DaySummary>,
    pub top_products: Vec<ProductSales>,
}

/// Turns the query into an inclusive day range.
pub fn resolve_period(
    query: &SummaryQuery,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    if let Some(period) = query.period.as_deref() {
        let from = match period {
            "today" => today,
            "week" => today - Days::new(u64::from(today.weekday().num_days_from_sunday())),
            "month" => today.with_day(1).unwrap_or(today),
            _ => return Err(ServiceError::ValidationError("Invalid period".to_string())),
        };
        return Ok((from, today));
    }

    let (Some(from), Some(to)) = (query.from.as_deref(), query.to.as_deref()) else {
        return Err(ServiceError::ValidationError(
            "from and to required".to_string(),
        ));
    };
    let from = parse_day(from)?;
    let to = parse_day(to)?;
    if to < from {
        return Err(ServiceError::ValidationError(
            "from must not be after to".to_string(),
        ));
    }
    Ok((from, to))
}

fn parse_day(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::ValidationError(format!("Invalid date: {}", raw)))
}

/// `[from 00:00, to + 1 day 00:00)` in UTC
fn bounds(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = from.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = (to + Days::new(1)).and_time(chrono::NaiveTime::MIN).and_utc();
    (start, end)
}

/// Highest quantities first; ties go alphabetically so the list is stable.
pub fn top_products(sales: HashMap<String, i64>, limit: usize) -> Vec<ProductSales> {
    let mut ranked: Vec<ProductSales> = sales
        .into_iter()
        .map(|(name, quantity)| ProductSales { name, quantity })
        .collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

/// Sales reporting. Days are UTC calendar days.
#[derive(Clone, Debug)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    async fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<order::Model>, ServiceError> {
        order::Entity::find()
            .filter(order::Column::CreatedAt.gte(start))
            .filter(order::Column::CreatedAt.lt(end))
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    async fn payments_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        payment::Entity::find()
            .filter(payment::Column::PaidAt.gte(start))
            .filter(payment::Column::PaidAt.lt(end))
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn daily(&self) -> Result<DailyReport, ServiceError> {
        let today = Utc::now().date_naive();
        let (start, end) = bounds(today, today);
        let orders = self.orders_between(start, end).await?;
        let payments = self.payments_between(start, end).await?;

        Ok(DailyReport {
            date: today,
            orders: orders.len() as u64,
            revenue: payments.iter().map(|p| p.amount).sum(),
        })
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, query: SummaryQuery) -> Result<SummaryReport, ServiceError> {
        let (from, to) = resolve_period(&query, Utc::now().date_naive())?;
        let (start, end) = bounds(from, to);
        let orders = self.orders_between(start, end).await?;
        let payments = self.payments_between(start, end).await?;

        let mut daily: BTreeMap<NaiveDate, DaySummary> = from
            .iter_days()
            .take_while(|day| *day <= to)
            .map(|day| (day, DaySummary::default()))
            .collect();
        for order in &orders {
            if let Some(day) = daily.get_mut(&order.created_at.date_naive()) {
                day.orders += 1;
            }
        }
        for payment in &payments {
            if let Some(day) = payment
                .paid_at
                .and_then(|paid_at| daily.get_mut(&paid_at.date_naive()))
            {
                day.revenue += payment.amount;
            }
        }

        let db = &*self.db_pool;
        let lines = orders
            .load_many(order_item::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;
        let menu_ids: Vec<i32> = lines.iter().flatten().map(|l| l.menu_item_id).collect();
        let names: HashMap<i32, String> = menu_item::Entity::find()
            .filter(menu_item::Column::Id.is_in(menu_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let mut sales: HashMap<String, i64> = HashMap::new();
        for line in lines.iter().flatten() {
            let name = names
                .get(&line.menu_item_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());
            *sales.entry(name).or_default() += i64::from(line.quantity);
        }

        Ok(SummaryReport {
            from,
            to,
            total_orders: orders.len() as u64,
            total_revenue: payments.iter().map(|p| p.amount).sum(),
            daily,
            top_products: top_products(sales, TOP_PRODUCTS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(name: &str) -> SummaryQuery {
        SummaryQuery {
            period: Some(name.to_string()),
            ..Default::default()
        }
    }

    // 2024-05-16 is a Thursday
    #[rstest]
    #[case("today", day(2024, 5, 16))]
    #[case("week", day(2024, 5, 12))]
    #[case("month", day(2024, 5, 1))]
    fn periods_end_today(#[case] name: &str, #[case] expected_from: NaiveDate) {
        let today = day(2024, 5, 16);
        let (from, to) = resolve_period(&period(name), today).unwrap();
        assert_eq!(from, expected_from);
        assert_eq!(to, today);
    }

    #[test]
    fn week_starting_on_sunday_is_a_single_day() {
        let sunday = day(2024, 5, 12);
        assert_eq!(
            resolve_period(&period("week"), sunday).unwrap(),
            (sunday, sunday)
        );
    }

    #[test]
    fn unknown_period_is_rejected() {
        assert_matches!(
            resolve_period(&period("year"), day(2024, 5, 16)),
            Err(ServiceError::ValidationError(msg)) if msg == "Invalid period"
        );
    }

    #[test]
    fn explicit_range_needs_both_ends() {
        let query = SummaryQuery {
            from: Some("2024-05-01".into()),
            ..Default::default()
        };
        assert_matches!(
            resolve_period(&query, day(2024, 5, 16)),
            Err(ServiceError::ValidationError(msg)) if msg == "from and to required"
        );

        let query = SummaryQuery {
            from: Some("2024-05-01".into()),
            to: Some("2024-05-03".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_period(&query, day(2024, 5, 16)).unwrap(),
            (day(2024, 5, 1), day(2024, 5, 3))
        );
    }

    #[test]
    fn bounds_cover_whole_days() {
        let (start, end) = bounds(day(2024, 5, 1), day(2024, 5, 3));
        assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-05-04T00:00:00+00:00");
    }

    #[test]
    fn top_products_rank_by_quantity_then_name() {
        let sales = HashMap::from([
            ("Chai".to_string(), 4),
            ("Samosa".to_string(), 9),
            ("Mandazi".to_string(), 4),
            ("Pilau".to_string(), 1),
        ]);
        let top = top_products(sales, 3);
        let names: Vec<_> = top.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Samosa", "Chai", "Mandazi"]);
    }
}
