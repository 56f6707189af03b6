use crate::domain::clean::{normalize_location, CleanListing};
use crate::domain::listing::PropertyType;
use crate::domain::market::{self, MarketFilter, MarketReport};
use crate::errors::ServerError;
use crate::predict::{predict_price, LinearModel, PredictError, PredictionInput};
use crate::responses::{csv_response, html_response, ResultResp};
use crate::spreadsheets::{export_listings_xlsx, listings_csv};
use crate::templates::pages::{dashboard_page, predict_page, DashboardVm, PredictVm};
use astra::Request;

/// Read-only data shared by every request.
pub struct AppState {
    pub listings: Vec<CleanListing>,
    pub locations: Vec<String>,
    pub model: Option<LinearModel>,
}

impl AppState {
    pub fn new(listings: Vec<CleanListing>, model: Option<LinearModel>) -> Self {
        let locations = market::locations(&listings);
        Self {
            listings,
            locations,
            model,
        }
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        ("GET", "/") => market_overview(&req, state),
        ("GET", "/predict") => predict(&req, state),
        ("GET", "/download.csv") => csv_response(listings_csv(&state.listings)?, "nairobi_listings.csv"),
        ("GET", "/download.xlsx") => export_listings_xlsx(&state.listings),
        _ => Err(ServerError::NotFound),
    }
}

fn market_overview(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req);
    let filter = market_filter(&params)?;
    let view = filter.apply(&state.listings);

    let vm = DashboardVm {
        report: MarketReport::build(&view),
        all_locations: &state.locations,
        filter: &filter,
    };

    html_response(dashboard_page(&vm))
}

fn predict(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req);

    // Bare /predict shows the empty form.
    if params.is_empty() {
        return html_response(predict_page(&PredictVm {
            input: PredictionInput::default(),
            prediction: None,
        }));
    }

    let model = state.model.as_ref().ok_or(ServerError::ModelUnavailable)?;
    let input = prediction_input(&params)?;

    let prediction = predict_price(model, input.clone()).map_err(|e| match e {
        PredictError::InvalidInput(msg) => ServerError::BadRequest(msg),
        PredictError::ModelLoad(_) => ServerError::ModelUnavailable,
    })?;

    html_response(predict_page(&PredictVm {
        input: PredictionInput {
            location: normalize_location(&input.location),
            ..input
        },
        prediction: Some(prediction),
    }))
}

fn market_filter(params: &[(String, String)]) -> Result<MarketFilter, ServerError> {
    let mut filter = MarketFilter::default();

    for (key, value) in params {
        match key.as_str() {
            "location" => {
                filter.locations.insert(normalize_location(value));
            }
            "type" => {
                let t = value
                    .parse::<PropertyType>()
                    .map_err(ServerError::BadRequest)?;
                filter.property_types.insert(t);
            }
            _ => {}
        }
    }

    Ok(filter)
}

fn prediction_input(params: &[(String, String)]) -> Result<PredictionInput, ServerError> {
    let defaults = PredictionInput::default();

    Ok(PredictionInput {
        location: param(params, "location")
            .map(str::to_string)
            .unwrap_or(defaults.location),
        bedrooms: number_param(params, "bedrooms")?.unwrap_or(defaults.bedrooms),
        bathrooms: number_param(params, "bathrooms")?.unwrap_or(defaults.bathrooms),
        size_sqm: number_param(params, "size")?.unwrap_or(defaults.size_sqm),
        amenity_score: number_param(params, "amenity_score")?.unwrap_or(defaults.amenity_score),
    })
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn number_param(params: &[(String, String)], name: &str) -> Result<Option<u32>, ServerError> {
    param(params, name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| ServerError::BadRequest(format!("{name} must be a whole number")))
        })
        .transpose()
}

/// Query pairs in order, percent-decoded. Repeated keys are kept.
fn parse_query(req: &Request) -> Vec<(String, String)> {
    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
