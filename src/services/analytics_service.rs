use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::database::{Store, StoreError};
use crate::models::{AdminStats, CategoryStat, MenuItem, PaymentRecord};

/// Sums `price` over every payment document.
pub fn revenue_pipeline() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": null,
            "totalRevenue": { "$sum": "$price" }
        }
    }]
}

/// Per-category statistics: one row per purchased catalog reference, inner
/// joined against the catalog, grouped by category.
///
/// Revenue uses the catalog price at read time, not the price paid. A
/// reference that is not a valid ObjectId, or whose item was deleted, joins
/// nothing and is dropped.
pub fn order_stats_pipeline(menu_collection: &str) -> Vec<Document> {
    vec![
        doc! { "$unwind": { "path": "$menuId" } },
        doc! {
            "$lookup": {
                "from": menu_collection,
                "let": {
                    "menuId": {
                        "$convert": {
                            "input": "$menuId",
                            "to": "objectId",
                            "onError": null,
                            "onNull": null
                        }
                    }
                },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": ["$_id", "$$menuId"] } } }
                ],
                "as": "menuDetail"
            }
        },
        doc! { "$unwind": { "path": "$menuDetail" } },
        doc! {
            "$group": {
                "_id": "$menuDetail.category",
                "quantity": { "$sum": 1 },
                "revenue": { "$sum": "$menuDetail.price" }
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "category": "$_id",
                "quantity": 1,
                "revenue": 1
            }
        },
    ]
}

/// Same semantics as [`order_stats_pipeline`], evaluated in process.
pub fn aggregate_category_stats(
    payments: &[PaymentRecord],
    menu: &HashMap<ObjectId, MenuItem>,
) -> Vec<CategoryStat> {
    let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();

    let joined = payments
        .iter()
        .flat_map(|payment| payment.menu_item_ids.iter())
        .filter_map(|raw| ObjectId::parse_str(raw).ok())
        .filter_map(|id| menu.get(&id));

    for item in joined {
        let entry = groups.entry(item.category.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += item.price;
    }

    groups
        .into_iter()
        .map(|(category, (quantity, revenue))| CategoryStat {
            category: Some(category.to_string()),
            quantity,
            revenue,
        })
        .collect()
}

async fn within<T, F>(budget: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(budget, fut)
        .await
        .map_err(|_| StoreError::Timeout)?
}

/// Global summary for the admin dashboard.
pub async fn admin_summary(store: &dyn Store, budget: Duration) -> Result<AdminStats, StoreError> {
    within(budget, async {
        let counts = store.collection_counts().await?;
        let revenue = store.total_revenue().await?;

        Ok::<_, StoreError>(AdminStats {
            users: counts.users,
            menu_items: counts.menu_items,
            orders: counts.payments,
            revenue,
        })
    })
    .await
}

/// Row order is not meaningful.
pub async fn order_stats(
    store: &dyn Store,
    budget: Duration,
) -> Result<Vec<CategoryStat>, StoreError> {
    within(budget, store.category_stats()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;
    use crate::models::CheckoutRequest;
    use crate::services::checkout_service;

    const BUDGET: Duration = Duration::from_secs(5);

    async fn pay_for(store: &InMemoryStore, items: &[ObjectId]) {
        let request = CheckoutRequest {
            email: "ana@bistro.test".into(),
            price: 1.0,
            transaction_id: None,
            date: None,
            menu_item_ids: items.iter().map(|id| id.to_hex()).collect(),
            cart_entry_ids: vec![],
            status: None,
        };
        checkout_service::checkout(store, request).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_category_rows_are_merged() {
        let store = InMemoryStore::new();
        let x = store.seed_menu_item("Brownie", "Dessert", 5.0);
        let y = store.seed_menu_item("Tart", "Dessert", 7.0);
        pay_for(&store, &[x]).await;
        pay_for(&store, &[y]).await;

        let rows = order_stats(&store, BUDGET).await.unwrap();

        assert_eq!(
            rows,
            vec![CategoryStat {
                category: Some("Dessert".into()),
                quantity: 2,
                revenue: 12.0
            }]
        );
    }

    #[tokio::test]
    async fn test_deleted_catalog_items_are_dropped() {
        let store = InMemoryStore::new();
        let kept = store.seed_menu_item("Salad", "Salad", 6.0);
        let gone = store.seed_menu_item("Old soup", "Soup", 9.0);
        pay_for(&store, &[kept, gone]).await;
        store.remove_menu_item(&gone);

        let rows = order_stats(&store, BUDGET).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category.as_deref(), Some("Salad"));
        assert_eq!(rows[0].quantity, 1);
        assert_eq!(rows[0].revenue, 6.0);
    }

    #[test]
    fn test_uses_current_catalog_price_and_skips_bad_refs() {
        let pizza_id = ObjectId::new();
        let mut menu = HashMap::new();
        menu.insert(
            pizza_id,
            MenuItem {
                id: Some(pizza_id),
                name: "Margherita".into(),
                category: "Pizza".into(),
                price: 14.0,
                recipe: None,
                image: None,
            },
        );
        let payment = PaymentRecord {
            id: None,
            email: "ana@bistro.test".into(),
            amount: 20.0,
            transaction_id: None,
            ordered_at: chrono::Utc::now(),
            menu_item_ids: vec![pizza_id.to_hex(), pizza_id.to_hex(), "garbage".into()],
            cart_entry_ids: vec![],
            status: None,
        };

        let rows = aggregate_category_stats(&[payment], &menu);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].revenue, 28.0);
    }

    #[tokio::test]
    async fn test_summary_with_no_payments_reports_zero_revenue() {
        let store = InMemoryStore::new();
        store.seed_user("ana@bistro.test", crate::models::Role::Regular);
        store.seed_menu_item("Cake", "Dessert", 5.0);

        let stats = admin_summary(&store, BUDGET).await.unwrap();

        assert_eq!(
            stats,
            AdminStats {
                users: 1,
                menu_items: 1,
                orders: 0,
                revenue: 0.0
            }
        );
    }

    #[tokio::test]
    async fn test_slow_aggregation_times_out() {
        let store = InMemoryStore::new();
        store.delay_category_stats(Duration::from_millis(200));

        let result = order_stats(&store, Duration::from_millis(1)).await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[test]
    fn test_pipeline_is_inner_join() {
        let pipeline = order_stats_pipeline("menu");
        let stages: Vec<&str> = pipeline
            .iter()
            .filter_map(|stage| stage.keys().next().map(String::as_str))
            .collect();

        assert_eq!(stages, ["$unwind", "$lookup", "$unwind", "$group", "$project"]);
        // preserveNullAndEmptyArrays would turn the join into an outer join
        let second_unwind = pipeline[2].get_document("$unwind").unwrap();
        assert!(!second_unwind.contains_key("preserveNullAndEmptyArrays"));
    }
}
