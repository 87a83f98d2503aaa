//! The game client facade.
//!
//! [`SpaceTrader`] ties the pieces together: every operation goes through the
//! [`ApiClient`] (rate-limit retry around the request pipeline), read-only
//! listings are served from a TTL cache when fresh, state changes emit an
//! [`Event`], and created flight plans are handed to the
//! [`FlightPlanTracker`].
//!
//! Operations never mutate the caller's identity: each authenticated call
//! takes the [`Session`] it should run as.

use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use spacetraders_common::{CacheStats, TtlCache};
use spacetraders_domain::{
    Account, ApiError, ClientConfig, Event, FlightPlan, FlightPlanEventKind, Loan,
    LoanEventKind, LoanType, Location, LocationKind, Market, Result, Session, Ship, ShipClass,
    ShipOrder, ShipOrderKind, SpaceTradersError, System, SystemFlightPlan,
};
use tracing::{debug, info, instrument};

use crate::api::responses::{
    FlightPlanEnvelope, FlightPlansEnvelope, LoansEnvelope, LocationsEnvelope, MarketEnvelope,
    PlanetEnvelope, RegistrationEnvelope, ShipsEnvelope, StatusEnvelope, SystemsEnvelope,
    UserEnvelope,
};
use crate::api::ApiClient;
use crate::events::{EventBus, EventStream};
use crate::http::RequestSpec;
use crate::tracker::{FlightPlanSource, FlightPlanTracker};

const AVAILABLE_LOANS_KEY: &str = "available_loans";
const AVAILABLE_SHIPS_KEY: &str = "available_ships";
const SYSTEMS_KEY: &str = "systems";

fn account_key(session: &Session) -> String {
    format!("{}:account", session.username())
}

fn my_loans_key(session: &Session) -> String {
    format!("{}:my_loans", session.username())
}

/// Values held by the read-through cache.
#[derive(Debug, Clone)]
enum CachedResource {
    Account(Account),
    Loans(Vec<Loan>),
    Ships(Vec<Ship>),
    Systems(Vec<System>),
}

trait Cacheable: Sized {
    fn into_resource(self) -> CachedResource;
    fn from_resource(resource: CachedResource) -> Option<Self>;
}

impl Cacheable for Account {
    fn into_resource(self) -> CachedResource {
        CachedResource::Account(self)
    }

    fn from_resource(resource: CachedResource) -> Option<Self> {
        match resource {
            CachedResource::Account(account) => Some(account),
            _ => None,
        }
    }
}

impl Cacheable for Vec<Loan> {
    fn into_resource(self) -> CachedResource {
        CachedResource::Loans(self)
    }

    fn from_resource(resource: CachedResource) -> Option<Self> {
        match resource {
            CachedResource::Loans(loans) => Some(loans),
            _ => None,
        }
    }
}

impl Cacheable for Vec<Ship> {
    fn into_resource(self) -> CachedResource {
        CachedResource::Ships(self)
    }

    fn from_resource(resource: CachedResource) -> Option<Self> {
        match resource {
            CachedResource::Ships(ships) => Some(ships),
            _ => None,
        }
    }
}

impl Cacheable for Vec<System> {
    fn into_resource(self) -> CachedResource {
        CachedResource::Systems(self)
    }

    fn from_resource(resource: CachedResource) -> Option<Self> {
        match resource {
            CachedResource::Systems(systems) => Some(systems),
            _ => None,
        }
    }
}

fn require(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SpaceTradersError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn require_quantity(quantity: u32) -> Result<u32> {
    if quantity == 0 {
        return Err(SpaceTradersError::Validation("quantity must be greater than 0".into()));
    }
    Ok(quantity)
}

/// SpaceTraders game client.
///
/// Must be created inside a Tokio runtime; the flight-plan tracker is started
/// during construction and stopped by [`shutdown`](Self::shutdown) or when the
/// client is dropped.
#[derive(Debug)]
pub struct SpaceTrader {
    api: Arc<ApiClient>,
    cache: TtlCache<CachedResource>,
    events: EventBus,
    tracker: FlightPlanTracker,
}

impl SpaceTrader {
    /// Build a client and start its flight-plan tracker.
    ///
    /// # Errors
    ///
    /// [`SpaceTradersError::Config`] for an invalid configuration or when no
    /// Tokio runtime is available.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        let events = EventBus::new(&config.events)?;
        let source: Arc<dyn FlightPlanSource> = api.clone();
        let tracker = FlightPlanTracker::new(source, events.clone(), config.tracker.clone());
        tracker.start()?;

        info!(base_url = %api.base_url(), auth = %config.auth, "SpaceTraders client ready");
        Ok(Self { api, cache: TtlCache::new(config.cache.ttl), events, tracker })
    }

    /// Build a client from the environment or a config file
    /// (see [`crate::config::load`]).
    pub fn from_env() -> Result<Self> {
        Self::new(crate::config::load()?)
    }

    /// Consumer handle for the client's events.
    pub fn events(&self) -> EventStream {
        self.events.stream()
    }

    /// Ids of the flight plans still awaiting completion.
    pub fn tracked_flight_plans(&self) -> Vec<String> {
        self.tracker.tracked_ids()
    }

    pub fn is_tracking(&self, flight_plan_id: &str) -> bool {
        self.tracker.is_tracking(flight_plan_id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Stop the flight-plan tracker. Further flight plans are still created
    /// but no longer resolved into `ENDED` events.
    pub async fn shutdown(&self) {
        self.tracker.shutdown().await;
    }

    /// Euclidean distance between two locations.
    pub fn distance(a: &Location, b: &Location) -> f64 {
        a.distance_to(b)
    }

    /* ---------------------------------------------------------------------- */
    /* Users */
    /* ---------------------------------------------------------------------- */

    /// Current status line of the game servers.
    #[instrument(skip(self))]
    pub async fn api_status(&self) -> Result<String> {
        let spec = RequestSpec::get(["game", "status"]);
        let reply: StatusEnvelope = self.api.send(spec, None).await?;
        Ok(reply.status)
    }

    /// Claim `username` and return the session for it.
    #[instrument(skip(self))]
    pub async fn register_user(&self, username: &str) -> Result<Session> {
        let username = require("username", username)?;
        let spec = RequestSpec::post(["users", username.as_str(), "token"]);
        let reply: RegistrationEnvelope = self.api.send(spec, None).await?;

        let token = reply.token.filter(|token| !token.is_empty()).ok_or_else(|| {
            SpaceTradersError::Domain(ApiError::new("unknown", "error occurred", 0))
        })?;
        let session = Session::new(username, token);

        if let Some(account) = reply.user {
            self.cache.store(&account_key(&session), account.into_resource());
        }
        info!(user = %session.username(), "registered user");
        self.events.emit(Event::user_registered(session.clone()));
        Ok(session)
    }

    /// Build the session for an existing user. Nothing is sent to the
    /// server; other sessions are unaffected.
    pub fn switch_user(&self, token: &str, username: &str) -> Result<Session> {
        let session = Session::new(require("username", username)?, require("token", token)?);
        debug!(user = %session.username(), "switched user");
        self.events.emit(Event::user_switched(session.clone()));
        Ok(session)
    }

    #[instrument(skip(self, session), fields(user = %session.username()))]
    pub async fn account(&self, session: &Session) -> Result<Account> {
        let spec = RequestSpec::get(["users", session.username()]);
        self.read_through(&account_key(session), session, spec, |reply: UserEnvelope| reply.user)
            .await
    }

    /* ---------------------------------------------------------------------- */
    /* Loans */
    /* ---------------------------------------------------------------------- */

    pub async fn available_loans(&self, session: &Session) -> Result<Vec<Loan>> {
        let spec = RequestSpec::get(["game", "loans"]);
        self.read_through(AVAILABLE_LOANS_KEY, session, spec, |reply: LoansEnvelope| reply.loans)
            .await
    }

    pub async fn my_loans(&self, session: &Session) -> Result<Vec<Loan>> {
        let spec = RequestSpec::get(["users", session.username(), "loans"]);
        self.read_through(&my_loans_key(session), session, spec, |reply: LoansEnvelope| {
            reply.loans
        })
        .await
    }

    /// Take out a loan of `loan_type` (`STARTUP` or `ENTERPRISE`).
    #[instrument(skip(self, session), fields(user = %session.username()))]
    pub async fn take_loan(&self, session: &Session, loan_type: &str) -> Result<Account> {
        let loan_type = LoanType::from_str(loan_type)?;
        let spec = RequestSpec::post(["users", session.username(), "loans"])
            .json(json!({ "type": loan_type.as_str() }));
        let reply: UserEnvelope = self.api.send(spec, Some(session)).await?;

        self.remember_account(session, &reply.user);
        self.cache.remove(&my_loans_key(session));
        self.events.emit(Event::loan(LoanEventKind::Purchased, reply.user.clone()));
        Ok(reply.user)
    }

    #[instrument(skip(self, session), fields(user = %session.username()))]
    pub async fn pay_loan(&self, session: &Session, loan_id: &str) -> Result<Account> {
        let loan_id = require("loan id", loan_id)?;
        let spec = RequestSpec::put(["users", session.username(), "loans", loan_id.as_str()]);
        let reply: UserEnvelope = self.api.send(spec, Some(session)).await?;

        self.remember_account(session, &reply.user);
        self.cache.remove(&my_loans_key(session));
        self.events.emit(Event::loan(LoanEventKind::Paid, reply.user.clone()));
        Ok(reply.user)
    }

    /* ---------------------------------------------------------------------- */
    /* Ships */
    /* ---------------------------------------------------------------------- */

    /// Ships for sale, optionally restricted to one class (`MK-I`, `MK-II`,
    /// `MK-III`). An empty class means no filter.
    ///
    /// Only the unfiltered listing is cached; a filtered request is answered
    /// from a fresh cached listing when there is one.
    #[instrument(skip(self, session), fields(user = %session.username()))]
    pub async fn available_ships(
        &self,
        session: &Session,
        class: Option<&str>,
    ) -> Result<Vec<Ship>> {
        let class = match class.map(str::trim).filter(|class| !class.is_empty()) {
            Some(class) => Some(ShipClass::from_str(class)?),
            None => None,
        };

        let cached =
            self.cache.fetch_fresh(AVAILABLE_SHIPS_KEY).and_then(Vec::<Ship>::from_resource);
        if let Some(ships) = cached {
            return Ok(match class {
                Some(class) => {
                    ships.into_iter().filter(|ship| class.matches(&ship.class)).collect()
                }
                None => ships,
            });
        }

        let mut spec = RequestSpec::get(["game", "ships"]);
        if let Some(class) = class {
            spec = spec.query("class", class.as_str());
        }
        let reply: ShipsEnvelope = self.api.send(spec, Some(session)).await?;

        if class.is_none() {
            self.cache.store(AVAILABLE_SHIPS_KEY, reply.ships.clone().into_resource());
        }
        Ok(reply.ships)
    }

    /// Buy a ship of `ship_type` at `location`.
    #[instrument(skip(self, session), fields(user = %session.username()))]
    pub async fn buy_ship(
        &self,
        session: &Session,
        location: &str,
        ship_type: &str,
    ) -> Result<Account> {
        let location = require("location", location)?;
        let ship_type = require("ship type", ship_type)?.to_uppercase();
        let spec = RequestSpec::post(["users", session.username(), "ships"])
            .json(json!({ "location": location, "type": ship_type }));
        let reply: UserEnvelope = self.api.send(spec, Some(session)).await?;

        self.remember_account(session, &reply.user);
        self.events.emit(Event::ship_purchased(reply.user.clone()));
        Ok(reply.user)
    }

    /* ---------------------------------------------------------------------- */
    /* Trade */
    /* ---------------------------------------------------------------------- */

    pub async fn buy_good(
        &self,
        session: &Session,
        ship_id: &str,
        good: &str,
        quantity: u32,
    ) -> Result<ShipOrder> {
        self.place_order(session, ShipOrderKind::Buy, ship_id, good, quantity).await
    }

    pub async fn sell_good(
        &self,
        session: &Session,
        ship_id: &str,
        good: &str,
        quantity: u32,
    ) -> Result<ShipOrder> {
        self.place_order(session, ShipOrderKind::Sell, ship_id, good, quantity).await
    }

    #[instrument(skip(self, session), fields(user = %session.username()))]
    async fn place_order(
        &self,
        session: &Session,
        kind: ShipOrderKind,
        ship_id: &str,
        good: &str,
        quantity: u32,
    ) -> Result<ShipOrder> {
        let ship_id = require("ship id", ship_id)?;
        let good = require("good", good)?;
        let quantity = require_quantity(quantity)?;

        let endpoint = match kind {
            ShipOrderKind::Buy => "purchase-orders",
            ShipOrderKind::Sell => "sell-orders",
        };
        let spec = RequestSpec::post(["users", session.username(), endpoint])
            .json(json!({ "shipId": ship_id, "good": good, "quantity": quantity }));
        let order: ShipOrder = self.api.send(spec, Some(session)).await?;

        // credits changed
        self.cache.remove(&account_key(session));
        self.events.emit(Event::ship_order(kind, order.clone()));
        Ok(order)
    }

    /* ---------------------------------------------------------------------- */
    /* Locations */
    /* ---------------------------------------------------------------------- */

    /// Locations of `kind` (e.g. `PLANET`, `GAS_GIANT`) in `system`.
    pub async fn search_system(
        &self,
        session: &Session,
        system: &str,
        kind: &str,
    ) -> Result<Vec<Location>> {
        let kind = LocationKind::from_str(kind)?;
        let system = require("system", system)?;
        let spec = RequestSpec::get(["game", "systems", system.as_str(), "locations"])
            .query("type", kind.as_str());
        let reply: LocationsEnvelope = self.api.send(spec, Some(session)).await?;
        Ok(reply.locations)
    }

    pub async fn location(&self, session: &Session, symbol: &str) -> Result<Location> {
        let symbol = require("location symbol", symbol)?;
        let spec = RequestSpec::get(["game", "locations", symbol.as_str()]);
        let reply: PlanetEnvelope = self.api.send(spec, Some(session)).await?;
        Ok(reply.planet)
    }

    pub async fn locations_in_system(
        &self,
        session: &Session,
        system: &str,
    ) -> Result<Vec<Location>> {
        let system = require("system", system)?;
        let spec = RequestSpec::get(["game", "systems", system.as_str(), "locations"]);
        let reply: LocationsEnvelope = self.api.send(spec, Some(session)).await?;
        Ok(reply.locations)
    }

    /// Marketplace listing of the location `symbol`.
    pub async fn market(&self, session: &Session, symbol: &str) -> Result<Market> {
        let symbol = require("location symbol", symbol)?;
        let spec = RequestSpec::get(["game", "locations", symbol.as_str(), "marketplace"]);
        let reply: MarketEnvelope = self.api.send(spec, Some(session)).await?;
        Ok(reply.planet.market)
    }

    pub async fn systems(&self, session: &Session) -> Result<Vec<System>> {
        let spec = RequestSpec::get(["game", "systems"]);
        self.read_through(SYSTEMS_KEY, session, spec, |reply: SystemsEnvelope| reply.systems).await
    }

    /* ---------------------------------------------------------------------- */
    /* Flight plans */
    /* ---------------------------------------------------------------------- */

    /// Send `ship_id` to `destination`. The returned plan is tracked until
    /// it arrives, at which point an `ENDED` event is emitted.
    #[instrument(skip(self, session), fields(user = %session.username()))]
    pub async fn create_flight_plan(
        &self,
        session: &Session,
        ship_id: &str,
        destination: &str,
    ) -> Result<FlightPlan> {
        let ship_id = require("ship id", ship_id)?;
        let destination = require("destination", destination)?;
        let spec = RequestSpec::post(["users", session.username(), "flight-plans"])
            .json(json!({ "shipId": ship_id, "destination": destination }));
        let reply: FlightPlanEnvelope = self.api.send(spec, Some(session)).await?;

        let plan = reply.flight_plan;
        self.tracker.track(session, plan.clone());
        self.events.emit(Event::flight_plan(FlightPlanEventKind::Created, plan.clone()));
        Ok(plan)
    }

    pub async fn flight_plan(
        &self,
        session: &Session,
        flight_plan_id: &str,
    ) -> Result<FlightPlan> {
        let flight_plan_id = require("flight plan id", flight_plan_id)?;
        self.api.fetch_flight_plan(session, &flight_plan_id).await
    }

    /// Every player's flight plans currently active in `system`.
    pub async fn flight_plans_in_system(
        &self,
        session: &Session,
        system: &str,
    ) -> Result<Vec<SystemFlightPlan>> {
        let system = require("system", system)?;
        let spec = RequestSpec::get(["game", "systems", system.as_str(), "flight-plans"]);
        let reply: FlightPlansEnvelope = self.api.send(spec, Some(session)).await?;
        Ok(reply.flight_plans)
    }

    /* ---------------------------------------------------------------------- */
    /* Cache plumbing */
    /* ---------------------------------------------------------------------- */

    async fn read_through<T, R, F>(
        &self,
        key: &str,
        session: &Session,
        spec: RequestSpec,
        extract: F,
    ) -> Result<T>
    where
        T: Cacheable + Clone,
        R: DeserializeOwned + Serialize,
        F: FnOnce(R) -> T,
    {
        if let Some(value) = self.cache.fetch_fresh(key).and_then(T::from_resource) {
            return Ok(value);
        }

        let reply: R = self.api.send(spec, Some(session)).await?;
        let value = extract(reply);
        self.cache.store(key, value.clone().into_resource());
        Ok(value)
    }

    fn remember_account(&self, session: &Session, account: &Account) {
        self.cache.store(&account_key(session), account.clone().into_resource());
    }
}
