use crate::api_client::ApiClient;
use crate::configuration::SuiteSettings;
use crate::scenarios::{self, ScenarioError};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    ListUsers,
    ListUsersIsStable,
    GetUser,
    GetMissingUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    RegisterUser,
    RegisterUserInvalid,
    DelayedListUsers,
}

impl Scenario {
    /// Every scenario, in the order a full run executes them.
    pub const ALL: [Scenario; 10] = [
        Scenario::ListUsers,
        Scenario::ListUsersIsStable,
        Scenario::GetUser,
        Scenario::GetMissingUser,
        Scenario::CreateUser,
        Scenario::UpdateUser,
        Scenario::DeleteUser,
        Scenario::RegisterUser,
        Scenario::RegisterUserInvalid,
        Scenario::DelayedListUsers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ListUsers => "list_users",
            Scenario::ListUsersIsStable => "list_users_is_stable",
            Scenario::GetUser => "get_user",
            Scenario::GetMissingUser => "get_missing_user",
            Scenario::CreateUser => "create_user",
            Scenario::UpdateUser => "update_user",
            Scenario::DeleteUser => "delete_user",
            Scenario::RegisterUser => "register_user",
            Scenario::RegisterUserInvalid => "register_user_invalid",
            Scenario::DelayedListUsers => "delayed_list_users",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::ListUsers => "GET /api/users - list users",
            Scenario::ListUsersIsStable => "GET /api/users twice - same page both times",
            Scenario::GetUser => "GET /api/users/{id} - single user",
            Scenario::GetMissingUser => "GET /api/users/{id} - single user not found",
            Scenario::CreateUser => "POST /api/users - create",
            Scenario::UpdateUser => "PUT /api/users/{id} - update",
            Scenario::DeleteUser => "DELETE /api/users/{id} - delete",
            Scenario::RegisterUser => "POST /api/register - register successful",
            Scenario::RegisterUserInvalid => "POST /api/register - register unsuccessful",
            Scenario::DelayedListUsers => "GET /api/users?delay=N - delayed response",
        }
    }

    pub async fn run(
        self,
        client: &ApiClient,
        settings: &SuiteSettings,
    ) -> Result<(), ScenarioError> {
        match self {
            Scenario::ListUsers => scenarios::list_users(client).await.map(|_| ()),
            Scenario::ListUsersIsStable => scenarios::list_users_is_stable(client).await,
            Scenario::GetUser => scenarios::get_user(client, settings).await,
            Scenario::GetMissingUser => scenarios::get_missing_user(client, settings).await,
            Scenario::CreateUser => scenarios::create_user(client).await,
            Scenario::UpdateUser => scenarios::update_user(client).await,
            Scenario::DeleteUser => scenarios::delete_user(client).await,
            Scenario::RegisterUser => scenarios::register_user(client).await,
            Scenario::RegisterUserInvalid => {
                scenarios::register_user_rejects_invalid_payloads(client).await
            }
            Scenario::DelayedListUsers => scenarios::delayed_list_users(client, settings).await,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown scenario `{0}`")]
pub struct UnknownScenario(pub String);

impl std::str::FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

/// Scenarios to run for the given names, all of them if `names` is empty.
///
/// Declaration order wins over the order of `names`, duplicates collapse.
pub fn select_scenarios(names: &[String]) -> Result<Vec<Scenario>, UnknownScenario> {
    if names.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }
    let requested = names
        .iter()
        .map(|name| name.parse::<Scenario>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scenario::ALL
        .into_iter()
        .filter(|scenario| requested.contains(scenario))
        .collect())
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub duration: Duration,
    pub result: Result<(), ScenarioError>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Process exit status when the suite could not be started at all.
pub const STARTUP_FAILURE_EXIT_CODE: u8 = 2;

#[derive(Debug)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }

    /// 0 when every executed scenario passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }

    pub fn outcome(&self, scenario: Scenario) -> Option<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.scenario == scenario)
    }
}

impl std::fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for outcome in &self.outcomes {
            let verdict = if outcome.passed() { "ok" } else { "FAILED" };
            writeln!(
                f,
                "{:<24} {:<6} {:>6}ms  {}",
                outcome.scenario.name(),
                verdict,
                outcome.duration.as_millis(),
                outcome.scenario.description()
            )?;
            if let Err(e) = &outcome.result {
                writeln!(f, "    {}", e)?;
                if let ScenarioError::Transport(cause) = e {
                    writeln!(f, "    Caused by: {}", cause)?;
                }
            }
        }
        let failed = self.failures().count();
        write!(
            f,
            "\nrun {}: {} passed; {} failed",
            self.run_id,
            self.outcomes.len() - failed,
            failed
        )
    }
}

/// Run `scenarios` one after the other.
///
/// A failing scenario does not stop the run.
#[tracing::instrument(name = "Running contract suite", skip_all, fields(run_id = tracing::field::Empty))]
pub async fn run_suite(
    client: &ApiClient,
    settings: &SuiteSettings,
    scenarios: &[Scenario],
) -> SuiteReport {
    let run_id = Uuid::new_v4();
    tracing::Span::current().record("run_id", tracing::field::display(run_id));
    tracing::info!(
        "Verifying {} against {} scenarios",
        client.base_url(),
        scenarios.len()
    );

    let mut outcomes = Vec::with_capacity(scenarios.len());
    for &scenario in scenarios {
        let span = tracing::info_span!("Scenario", scenario = scenario.name(), %run_id);
        let started = Instant::now();
        let result = scenario.run(client, settings).instrument(span.clone()).await;
        let duration = started.elapsed();
        span.in_scope(|| match &result {
            Ok(()) => tracing::info!("Scenario passed"),
            Err(e) => tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Scenario failed"
            ),
        });
        outcomes.push(ScenarioOutcome {
            scenario,
            duration,
            result,
        });
    }

    SuiteReport { run_id, outcomes }
}
