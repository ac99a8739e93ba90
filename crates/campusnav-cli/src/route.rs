//! `route` command: validates a route against the location list, then asks
//! the directions service for it.

use std::sync::Arc;

use anyhow::Context;
use campusnav_core::{
    load_map_config, markers, AppConfig, Completion, Endpoint, LocationRecord, NavigatorSession,
    Submission,
};
use campusnav_directions::{DirectionsClient, Route};
use serde::Serialize;

use crate::locations::load_directory;

#[derive(Debug)]
pub(crate) struct RouteArgs {
    pub start: String,
    pub end: String,
    pub via: Vec<String>,
    pub plan_only: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RouteOutput<'a> {
    stops: Vec<&'a str>,
    request: &'a campusnav_core::DirectionsRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a Route>,
}

pub(crate) async fn run(config: &AppConfig, args: &RouteArgs) -> anyhow::Result<()> {
    let directory = Arc::new(load_directory(config)?);
    let map = load_map_config(&config.config_path).with_context(|| {
        format!(
            "failed to load map configuration from {}",
            config.config_path.display()
        )
    })?;

    let mut session = NavigatorSession::new(directory, map);
    let submission = submit(&mut session, args)?;

    if args.plan_only {
        return print_result(&submission, None, args.json);
    }

    let client = DirectionsClient::with_base_url(
        config.maps_api_key.as_deref(),
        config.directions_timeout_secs,
        &config.directions_base_url,
    )?
    .with_retry(
        config.directions_max_retries,
        config.directions_backoff_base_ms,
    );

    let routes = client.route(&submission.request).await?;
    let routes = match session.complete(submission.ticket, routes) {
        Completion::Current(routes) => routes,
        Completion::Superseded { ticket, latest } => {
            anyhow::bail!("response to submission {ticket} arrived after submission {latest}")
        }
    };
    let route = routes
        .first()
        .context("directions service returned no routes")?;

    print_result(&submission, Some(route), args.json)
}

/// Fills the form the way a user would and submits it.
fn submit(session: &mut NavigatorSession, args: &RouteArgs) -> anyhow::Result<Submission> {
    session.type_text(Endpoint::Start, &args.start);
    session.type_text(Endpoint::End, &args.end);
    for stop in &args.via {
        let number = session.add_waypoint()?;
        session.set_waypoint(number, stop);
    }
    Ok(session.submit()?)
}

fn print_result(
    submission: &Submission,
    route: Option<&Route>,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let output = RouteOutput {
            stops: submission.stops.iter().map(LocationRecord::name).collect(),
            request: &submission.request,
            route,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let stops: Vec<&LocationRecord> = submission.stops.iter().collect();
    let legs = route.map(Route::leg_endpoints).unwrap_or_default();
    for marker in markers(&stops, &legs) {
        println!("{:>2}. {:<32}{}", marker.number, marker.label, marker.position);
    }

    if let Some(route) = route {
        println!();
        if !route.summary.is_empty() {
            println!("via {}", route.summary);
        }
        println!(
            "{} m, about {} min walking",
            route.total_distance_meters(),
            route.total_duration_seconds().div_ceil(60)
        );
        for warning in &route.warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}
