use axum_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(&config.database_url).await?;

    let admin = ensure_user(&pool, "9000000001", "admin", "Admin", None).await?;
    let buyer = ensure_user(&pool, "9000000002", "buyer", "Demo Buyer", None).await?;
    let seller_a = ensure_user(
        &pool,
        "9000000003",
        "seller",
        "Anita Traders",
        Some("12 Market Road, Katni 483501"),
    )
    .await?;
    let seller_b = ensure_user(
        &pool,
        "9000000004",
        "seller",
        "Verma Stores",
        Some("3 Station Road, Katni 483501"),
    )
    .await?;
    let partner = ensure_user(&pool, "9000000005", "delivery_partner", "Ravi Kumar", None).await?;
    sqlx::query("UPDATE users SET pincode = $1 WHERE id = $2")
        .bind("483501")
        .bind(partner)
        .execute(&pool)
        .await?;

    ensure_seller_profile(&pool, seller_a, "Anita Traders", "483501").await?;
    ensure_seller_profile(&pool, seller_b, "Verma Stores", "483501").await?;

    let grocery = ensure_category(&pool, "Grocery", "grocery").await?;
    let electronics = ensure_category(&pool, "Electronics", "electronics").await?;

    let products = [
        (seller_a, "Basmati Rice 5kg", 450_i64, 100, 5, grocery),
        (seller_a, "Sunflower Oil 1L", 160, 80, 5, grocery),
        (seller_b, "LED Bulb 9W", 120, 200, 10, electronics),
        (seller_b, "Bluetooth Speaker", 2400, 30, 12, electronics),
    ];
    for (seller_id, name, price, stock, commission, category) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, seller_id, name, price, stock, commission_percent, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(name)
        .bind(price)
        .bind(stock)
        .bind(commission)
        .bind(category)
        .execute(&pool)
        .await?;
    }

    println!("Seed completed. Admin: {admin}, Buyer: {buyer}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    mobile: &str,
    role: &str,
    name: &str,
    address: Option<&str>,
) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, mobile, role, full_name, address)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (mobile) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(mobile)
    .bind(role)
    .bind(name)
    .bind(address)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {mobile} (role={role})");
    Ok(row.0)
}

async fn ensure_seller_profile(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    shop_name: &str,
    pincode: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO seller_profiles (id, user_id, shop_name, pincode)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE SET pincode = EXCLUDED.pincode
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(shop_name)
    .bind(pincode)
    .execute(pool)
    .await?;
    Ok(())
}

async fn ensure_category(pool: &sqlx::PgPool, title: &str, slug: &str) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, title, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET title = EXCLUDED.title
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(slug)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}
