//! Postgres persistence gateway (sqlx).
//!
//! One statement per mutating call; uniqueness is additionally enforced
//! by unique indexes in the migrations, so a racing duplicate insert
//! surfaces as `AlreadyExists` instead of bypassing the existence check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::auth::{RefreshToken, Role, User};
use crate::models::expedition::{Location, Package, Person};
use crate::models::shipment::{
    DeliveryMethod, Shipment, ShipmentFilter, ShipmentStatus,
};
use crate::store::{
    Entity, EntityStore, LocationStore, PackageStore, PersonStore, RefreshTokenStore,
    ShipmentStore, UserStore,
};

/// Parse a TEXT enum column, reporting corrupt values as internal errors.
fn parse_enum<T: std::str::FromStr<Err = String>>(raw: &str) -> DomainResult<T> {
    raw.parse::<T>().map_err(DomainError::Internal)
}

/// Map an affected-row count to the existence contract.
fn expect_row(rows_affected: u64, kind: &'static str) -> DomainResult<()> {
    if rows_affected == 0 {
        return Err(DomainError::NotFound(kind));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

type UserRow = (Uuid, String, String, String, String, String, String);

fn user_from_row(row: UserRow) -> DomainResult<User> {
    let (id, email, password_hash, role, first_name, last_name, phone) = row;
    Ok(User {
        id,
        email,
        password_hash,
        role: parse_enum::<Role>(&role)?,
        first_name,
        last_name,
        phone,
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, role, first_name, last_name, phone";

/// User repository backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<User> for PgUserStore {
    async fn add(&self, user: &User) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, first_name, last_name, phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE users SET email = $2, password_hash = $3, role = $4, \
             first_name = $5, last_name = $6, phone = $7 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected(), User::kind())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected(), User::kind())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose()
    }

    async fn get_all(&self) -> DomainResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(user_from_row).collect()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose()
    }
}

// ---------------------------------------------------------------------------
// Refresh tokens
// ---------------------------------------------------------------------------

type RefreshTokenRow = (Uuid, String, DateTime<Utc>, i64, Uuid);

fn refresh_token_from_row(row: RefreshTokenRow) -> RefreshToken {
    let (id, token, created_at, lifetime_minutes, user_id) = row;
    RefreshToken {
        id,
        token,
        created_at,
        lifetime_minutes,
        user_id,
    }
}

const REFRESH_COLUMNS: &str = "id, token, created_at, lifetime_minutes, user_id";

/// Refresh-token repository backed by the `refresh_tokens` table.
#[derive(Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<RefreshToken> for PgRefreshTokenStore {
    async fn add(&self, token: &RefreshToken) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (id, token, created_at, lifetime_minutes, user_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(token.id)
        .bind(&token.token)
        .bind(token.created_at)
        .bind(token.lifetime_minutes)
        .bind(token.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, token: &RefreshToken) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET token = $2, created_at = $3, \
             lifetime_minutes = $4, user_id = $5 WHERE id = $1",
        )
        .bind(token.id)
        .bind(&token.token)
        .bind(token.created_at)
        .bind(token.lifetime_minutes)
        .bind(token.user_id)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected(), RefreshToken::kind())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected(), RefreshToken::kind())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            "SELECT {REFRESH_COLUMNS} FROM refresh_tokens WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(refresh_token_from_row))
    }

    async fn get_all(&self) -> DomainResult<Vec<RefreshToken>> {
        let rows = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            "SELECT {REFRESH_COLUMNS} FROM refresh_tokens"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(refresh_token_from_row).collect())
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            "SELECT {REFRESH_COLUMNS} FROM refresh_tokens WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(refresh_token_from_row))
    }

    async fn rotate(
        &self,
        id: Uuid,
        new_token: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let result =
            sqlx::query("UPDATE refresh_tokens SET token = $2, created_at = $3 WHERE id = $1")
                .bind(id)
                .bind(new_token)
                .bind(created_at)
                .execute(&self.pool)
                .await?;
        expect_row(result.rows_affected(), RefreshToken::kind())
    }
}

// ---------------------------------------------------------------------------
// Persons
// ---------------------------------------------------------------------------

type PersonRow = (Uuid, String, String, String, String);

fn person_from_row(row: PersonRow) -> Person {
    let (id, first_name, last_name, email, phone) = row;
    Person {
        id,
        first_name,
        last_name,
        email,
        phone,
    }
}

const PERSON_COLUMNS: &str = "id, first_name, last_name, email, phone";

/// Person repository backed by the `persons` table.
#[derive(Clone)]
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Person> for PgPersonStore {
    async fn add(&self, person: &Person) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO persons (id, first_name, last_name, email, phone) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(person.id)
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.phone)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, person: &Person) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE persons SET first_name = $2, last_name = $3, email = $4, phone = $5 \
             WHERE id = $1",
        )
        .bind(person.id)
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.phone)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected(), Person::kind())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected(), Person::kind())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(person_from_row))
    }

    async fn get_all(&self) -> DomainResult<Vec<Person>> {
        let rows =
            sqlx::query_as::<_, PersonRow>(&format!("SELECT {PERSON_COLUMNS} FROM persons"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(person_from_row).collect())
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn find_by_phone(&self, phone: &str) -> DomainResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(person_from_row))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(person_from_row))
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

type LocationRow = (Uuid, String, String, String, String);

fn location_from_row(row: LocationRow) -> Location {
    let (id, street, city, postal_code, country) = row;
    Location {
        id,
        street,
        city,
        postal_code,
        country,
    }
}

const LOCATION_COLUMNS: &str = "id, street, city, postal_code, country";

/// Location repository backed by the `locations` table.
#[derive(Clone)]
pub struct PgLocationStore {
    pool: PgPool,
}

impl PgLocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Location> for PgLocationStore {
    async fn add(&self, location: &Location) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO locations (id, street, city, postal_code, country) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(location.id)
        .bind(&location.street)
        .bind(&location.city)
        .bind(&location.postal_code)
        .bind(&location.country)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, location: &Location) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE locations SET street = $2, city = $3, postal_code = $4, country = $5 \
             WHERE id = $1",
        )
        .bind(location.id)
        .bind(&location.street)
        .bind(&location.city)
        .bind(&location.postal_code)
        .bind(&location.country)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected(), Location::kind())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected(), Location::kind())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Location>> {
        let row = sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(location_from_row))
    }

    async fn get_all(&self) -> DomainResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(location_from_row).collect())
    }
}

#[async_trait]
impl LocationStore for PgLocationStore {
    async fn find_by_city(&self, city: &str) -> DomainResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE city = $1"
        ))
        .bind(city)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(location_from_row).collect())
    }
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

type PackageRow = (Uuid, f64, f64, f64, f64, String, Uuid, Option<Uuid>);

fn package_from_row(row: PackageRow) -> Package {
    let (id, weight_kg, width_cm, height_cm, depth_cm, contents, owner_id, shipment_id) = row;
    Package {
        id,
        weight_kg,
        width_cm,
        height_cm,
        depth_cm,
        contents,
        owner_id,
        shipment_id,
    }
}

const PACKAGE_COLUMNS: &str =
    "id, weight_kg, width_cm, height_cm, depth_cm, contents, owner_id, shipment_id";

/// Package repository backed by the `packages` table.
#[derive(Clone)]
pub struct PgPackageStore {
    pool: PgPool,
}

impl PgPackageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore<Package> for PgPackageStore {
    async fn add(&self, package: &Package) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO packages \
             (id, weight_kg, width_cm, height_cm, depth_cm, contents, owner_id, shipment_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(package.id)
        .bind(package.weight_kg)
        .bind(package.width_cm)
        .bind(package.height_cm)
        .bind(package.depth_cm)
        .bind(&package.contents)
        .bind(package.owner_id)
        .bind(package.shipment_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, package: &Package) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE packages SET weight_kg = $2, width_cm = $3, height_cm = $4, \
             depth_cm = $5, contents = $6, owner_id = $7, shipment_id = $8 WHERE id = $1",
        )
        .bind(package.id)
        .bind(package.weight_kg)
        .bind(package.width_cm)
        .bind(package.height_cm)
        .bind(package.depth_cm)
        .bind(&package.contents)
        .bind(package.owner_id)
        .bind(package.shipment_id)
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected(), Package::kind())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected(), Package::kind())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Package>> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(package_from_row))
    }

    async fn get_all(&self) -> DomainResult<Vec<Package>> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(package_from_row).collect())
    }
}

#[async_trait]
impl PackageStore for PgPackageStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Package>> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(package_from_row).collect())
    }
}

// ---------------------------------------------------------------------------
// Shipments
// ---------------------------------------------------------------------------

// Too wide for the tuple FromRow impls, so this one gets a derive.
#[derive(sqlx::FromRow)]
struct ShipmentRow {
    id: Uuid,
    package_id: Uuid,
    pickup_location_id: Uuid,
    destination_location_id: Uuid,
    sender_id: Uuid,
    recipient_id: Uuid,
    tracking_number: String,
    pickup_at: DateTime<Utc>,
    delivery_method: String,
    estimated_delivery_at: DateTime<Utc>,
    delivered_at: Option<DateTime<Utc>>,
    cost: f64,
    status: String,
}

fn shipment_from_row(row: ShipmentRow) -> DomainResult<Shipment> {
    Ok(Shipment {
        id: row.id,
        package_id: row.package_id,
        pickup_location_id: row.pickup_location_id,
        destination_location_id: row.destination_location_id,
        sender_id: row.sender_id,
        recipient_id: row.recipient_id,
        tracking_number: row.tracking_number,
        pickup_at: row.pickup_at,
        delivery_method: parse_enum::<DeliveryMethod>(&row.delivery_method)?,
        estimated_delivery_at: row.estimated_delivery_at,
        delivered_at: row.delivered_at,
        cost: row.cost,
        status: parse_enum::<ShipmentStatus>(&row.status)?,
    })
}

const SHIPMENT_COLUMNS: &str = "id, package_id, pickup_location_id, destination_location_id, \
     sender_id, recipient_id, tracking_number, pickup_at, delivery_method, \
     estimated_delivery_at, delivered_at, cost, status";

/// Shipment repository backed by the `shipments` table.
#[derive(Clone)]
pub struct PgShipmentStore {
    pool: PgPool,
}

impl PgShipmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        column: &str,
        bind: ShipmentBind<'_>,
    ) -> DomainResult<Option<Shipment>> {
        let sql = format!("SELECT {SHIPMENT_COLUMNS} FROM shipments WHERE {column} = $1");
        let query = sqlx::query_as::<_, ShipmentRow>(&sql);
        let row = match bind {
            ShipmentBind::Text(v) => query.bind(v).fetch_optional(&self.pool).await?,
            ShipmentBind::Timestamp(v) => query.bind(v).fetch_optional(&self.pool).await?,
            ShipmentBind::Float(v) => query.bind(v).fetch_optional(&self.pool).await?,
        };
        row.map(shipment_from_row).transpose()
    }
}

/// Bind value for the single-column shipment lookup.
enum ShipmentBind<'a> {
    Text(&'a str),
    Timestamp(DateTime<Utc>),
    Float(f64),
}

#[async_trait]
impl EntityStore<Shipment> for PgShipmentStore {
    async fn add(&self, shipment: &Shipment) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO shipments \
             (id, package_id, pickup_location_id, destination_location_id, sender_id, \
              recipient_id, tracking_number, pickup_at, delivery_method, \
              estimated_delivery_at, delivered_at, cost, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(shipment.id)
        .bind(shipment.package_id)
        .bind(shipment.pickup_location_id)
        .bind(shipment.destination_location_id)
        .bind(shipment.sender_id)
        .bind(shipment.recipient_id)
        .bind(&shipment.tracking_number)
        .bind(shipment.pickup_at)
        .bind(shipment.delivery_method.as_str())
        .bind(shipment.estimated_delivery_at)
        .bind(shipment.delivered_at)
        .bind(shipment.cost)
        .bind(shipment.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, shipment: &Shipment) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE shipments SET cost = $2, delivery_method = $3, delivered_at = $4, \
             status = $5 WHERE id = $1",
        )
        .bind(shipment.id)
        .bind(shipment.cost)
        .bind(shipment.delivery_method.as_str())
        .bind(shipment.delivered_at)
        .bind(shipment.status.as_str())
        .execute(&self.pool)
        .await?;
        expect_row(result.rows_affected(), Shipment::kind())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_row(result.rows_affected(), Shipment::kind())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Shipment>> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {SHIPMENT_COLUMNS} FROM shipments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(shipment_from_row).transpose()
    }

    async fn get_all(&self) -> DomainResult<Vec<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {SHIPMENT_COLUMNS} FROM shipments"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(shipment_from_row).collect()
    }
}

#[async_trait]
impl ShipmentStore for PgShipmentStore {
    async fn find_one(&self, filter: &ShipmentFilter) -> DomainResult<Option<Shipment>> {
        match filter {
            ShipmentFilter::TrackingNumber(n) => {
                self.fetch_where("tracking_number", ShipmentBind::Text(n)).await
            }
            ShipmentFilter::PickupAt(at) => {
                self.fetch_where("pickup_at", ShipmentBind::Timestamp(*at)).await
            }
            ShipmentFilter::DeliveredAt(at) => {
                self.fetch_where("delivered_at", ShipmentBind::Timestamp(*at)).await
            }
            ShipmentFilter::Cost(cost) => {
                self.fetch_where("cost", ShipmentBind::Float(*cost)).await
            }
            ShipmentFilter::Status(status) => {
                self.fetch_where("status", ShipmentBind::Text(status.as_str())).await
            }
        }
    }
}
