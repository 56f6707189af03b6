use crate::domain::listing::PropertyType;
use crate::domain::market::{MarketFilter, MarketReport};
use crate::templates::components::{card, kpi, thousands, value_table};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub report: MarketReport,
    pub all_locations: &'a [String],
    pub filter: &'a MarketFilter,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let o = &vm.report.overview;

    desktop_layout(
        "Nairobi Property Market",
        html! {
            main {
                h1 { "Nairobi Property Market" }

                (filter_form(vm))

                h2 { "Market Overview" }
                div class="kpis" {
                    (kpi("Total Listings", &o.total_listings.to_string()))
                    (kpi("Median Price (KES)", &fmt_opt(o.median_price)))
                    (kpi("Avg Price per Sqft", &fmt_opt(o.mean_price_per_sqft)))
                    (kpi("Median Bedrooms", &fmt_opt(o.median_bedrooms)))
                }

                (card("Median Price by Location", value_table(
                    "Location",
                    "Price (KES)",
                    &formatted(&vm.report.median_price_by_location),
                )))

                (card("Monthly Price Trend", html! {
                    @if vm.report.monthly_trend.is_empty() {
                        p { "No dated listings in this selection." }
                    } @else {
                        (value_table("Month", "Median Price (KES)", &formatted(&vm.report.monthly_trend)))
                    }
                }))

                (card("Price per Sqft Comparison", value_table(
                    "Location",
                    "Median price per sqft",
                    &formatted(&vm.report.price_per_sqft_by_location),
                )))

                (card("Amenity Impact on Price", html! {
                    @match &vm.report.amenity_tiers {
                        Some(tiers) => {
                            (value_table(
                                "Amenity tier",
                                "Median Price (KES)",
                                &tiers
                                    .iter()
                                    .map(|(t, v)| (t.to_string(), thousands(*v)))
                                    .collect::<Vec<_>>(),
                            ))
                        }
                        None => {
                            p class="warning" { "Not enough variation in amenity scores to analyze impact." }
                        }
                    }
                }))
            }
        },
    )
}

fn filter_form(vm: &DashboardVm) -> Markup {
    html! {
        form method="get" action="/" class="card" {
            fieldset {
                legend { "Locations" }
                @for loc in vm.all_locations {
                    label {
                        input type="checkbox" name="location" value=(loc)
                            checked[vm.filter.locations.contains(loc)];
                        " " (loc)
                    }
                    " "
                }
            }
            fieldset {
                legend { "Property Type" }
                @for t in PropertyType::ALL {
                    label {
                        input type="checkbox" name="type" value=(t.as_str())
                            checked[vm.filter.property_types.contains(&t)];
                        " " (t.as_str())
                    }
                    " "
                }
            }
            button type="submit" { "Apply" }
            " "
            a href="/" { "Reset" }
        }
    }
}

fn formatted(rows: &[(String, f64)]) -> Vec<(&str, String)> {
    rows.iter()
        .map(|(k, v)| (k.as_str(), thousands(*v)))
        .collect()
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(thousands).unwrap_or_else(|| "n/a".to_string())
}
