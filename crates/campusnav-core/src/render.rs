//! Data handed to the map renderer once a route has been computed: one
//! numbered marker per stop, each with its info-window content.

use serde::Serialize;

use crate::location::{Coordinate, LocationRecord};

/// Where one leg of a computed route begins and ends, as snapped by the
/// directions service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegEndpoints {
    pub start: Coordinate,
    pub end: Coordinate,
}

/// Content of the pop-up shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoWindow {
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

impl InfoWindow {
    #[must_use]
    pub fn for_location(record: &LocationRecord) -> Self {
        Self {
            title: record.name().to_string(),
            description: record.description().map(ToOwned::to_owned),
            address: record.full_street_address(),
        }
    }

    /// HTML fragment for the pop-up: bold title, then the description and
    /// address when known.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<center>\n\t<p><b>{}</b></p>\n", escape_html(&self.title));
        for line in [&self.description, &self.address].into_iter().flatten() {
            html.push_str(&format!("\t<p>{}</p>\n", escape_html(line)));
        }
        html.push_str("</center>");
        html
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    /// 1-based position of the stop along the route.
    pub number: usize,
    pub label: String,
    pub icon: String,
    pub position: Coordinate,
    pub info: InfoWindow,
}

/// One marker per stop, in travel order.
///
/// When `legs` has one entry fewer than `stops` (the shape of a route that
/// visits every stop), marker positions follow the route: each leg's start,
/// then the final leg's end. Otherwise the configured coordinates are used.
#[must_use]
pub fn markers(stops: &[&LocationRecord], legs: &[LegEndpoints]) -> Vec<MarkerSpec> {
    let snapped: Option<Vec<Coordinate>> = (!legs.is_empty() && legs.len() + 1 == stops.len())
        .then(|| {
            legs.iter()
                .map(|leg| leg.start)
                .chain(legs.last().map(|leg| leg.end))
                .collect()
        });

    stops
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let number = index + 1;
            let position = snapped
                .as_ref()
                .map_or_else(|| record.coordinate(), |positions| positions[index]);
            MarkerSpec {
                number,
                label: record.name().to_string(),
                icon: format!("icons/marker_{number}.png"),
                position,
                info: InfoWindow::for_location(record),
            }
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
