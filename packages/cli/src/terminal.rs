//! Interactive terminal dashboard.
//!
//! Prompts for a state, crime type, and year, then loops over actions
//! until the user quits. Each action goes through the same
//! [`Dashboard::handle`] call the HTTP front end uses.

use console::style;
use crime_dash_analytics::Dashboard;
use crime_dash_analytics_models::{
    DashboardAction, DashboardOptions, DashboardRequest, DashboardResponse, Selection,
};
use crime_dash_cli_utils::{IndicatifProgress, MultiProgress};
use crime_dash_crime_models::CrimeSelector;
use crime_dash_dataset::progress::ProgressCallback;
use crime_dash_model::RegressionModel;
use dialoguer::{Input, Select};

use crate::render;

/// What to do with the current selection.
enum Action {
    Predict,
    ShowCharts,
    ChangeSelection,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Predict,
        Self::ShowCharts,
        Self::ChangeSelection,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Predict => "Predict crime count",
            Self::ShowCharts => "Show trend & comparison charts",
            Self::ChangeSelection => "Change selection",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the terminal dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or a prompt fails.
pub fn run(dashboard: &Dashboard, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", style("Crime Data Analysis & Prediction").bold());
    println!("Predicts crime counts by state, crime type, and year.");
    println!();

    load_resources(dashboard, multi)?;
    let options = dashboard.options()?;

    let mut selection = choose_selection(&options, None)?;

    loop {
        println!();
        print!("{}", render::selection(&selection));

        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Predict => show(dashboard, &selection, DashboardAction::Predict),
            Action::ShowCharts => show(dashboard, &selection, DashboardAction::Refresh),
            Action::ChangeSelection => {
                selection = choose_selection(&options, Some(&selection))?;
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Loads the dataset behind a spinner and reports the model status.
fn load_resources(
    dashboard: &Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::rows_spinner(multi, "Loading crime data");
    if let Err(e) = dashboard.dataset().load_with_progress(progress.as_ref()) {
        progress.finish_and_clear();
        return Err(e.into());
    }

    let progress = IndicatifProgress::step_spinner(multi, "Loading prediction model");
    match dashboard.model().load() {
        Ok(model) => progress.finish(format!(
            "Loaded {} model ({} features)",
            model.kind(),
            model.feature_names().len()
        )),
        Err(e) => {
            progress.finish_and_clear();
            log::warn!("Predictions unavailable: {e}");
        }
    }

    Ok(())
}

/// Prompts for state, crime type, and year, starting from `current`.
fn choose_selection(
    options: &DashboardOptions,
    current: Option<&Selection>,
) -> Result<Selection, Box<dyn std::error::Error>> {
    if options.states.is_empty() {
        return Err("The crime dataset has no rows".into());
    }

    let state_default = current
        .and_then(|s| options.states.iter().position(|x| *x == s.state))
        .unwrap_or(0);
    let state_idx = Select::new()
        .with_prompt("Select State")
        .items(&options.states)
        .default(state_default)
        .interact()?;

    let crime_default = current
        .and_then(|s| {
            let label = s.crime.label();
            options.crime_options.iter().position(|x| x == label)
        })
        .unwrap_or(0);
    let crime_idx = Select::new()
        .with_prompt("Select Crime Type")
        .items(&options.crime_options)
        .default(crime_default)
        .interact()?;

    let bounds = options.years;
    let year: i32 = Input::new()
        .with_prompt(format!("Select Year ({}-{})", bounds.min, bounds.max))
        .default(current.map_or(bounds.default, |s| s.year))
        .validate_with(move |year: &i32| -> Result<(), String> {
            if bounds.contains(*year) {
                Ok(())
            } else {
                Err(format!("Year must be between {} and {}", bounds.min, bounds.max))
            }
        })
        .interact_text()?;

    Ok(Selection {
        state: options.states[state_idx].clone(),
        crime: CrimeSelector::from(options.crime_options[crime_idx].as_str()),
        year,
    })
}

/// Handles one interaction and prints the result or the error.
fn show(dashboard: &Dashboard, selection: &Selection, action: DashboardAction) {
    let request = DashboardRequest {
        selection: selection.clone(),
        action,
    };

    match dashboard.handle(&request) {
        Ok(response) => print_response(&response),
        Err(e) => {
            log::error!("Dashboard request failed: {e}");
            println!("{} {e}", style(format!("[{}]", e.kind())).red().bold());
        }
    }
}

fn print_response(response: &DashboardResponse) {
    if let Some(prediction) = &response.prediction {
        println!();
        println!("{}", style(render::prediction(prediction)).green().bold());
    }

    println!();
    println!("{}", render::trend(&response.trend));
    println!("{}", render::comparison(&response.comparison));
}
