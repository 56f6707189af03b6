use crate::predict::{Prediction, PredictionInput, KNOWN_LOCATIONS};
use crate::templates::components::{card, thousands};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct PredictVm {
    pub input: PredictionInput,
    pub prediction: Option<Prediction>,
}

pub fn predict_page(vm: &PredictVm) -> Markup {
    let input = &vm.input;

    desktop_layout(
        "Nairobi Property Price Predictor",
        html! {
            main {
                h1 { "Nairobi Property Price Predictor" }
                p { "Predict property prices using machine learning." }

                form method="get" action="/predict" class="card" {
                    p {
                        label for="location" { "Select Location " }
                        select id="location" name="location" {
                            @for loc in KNOWN_LOCATIONS {
                                option value=(loc) selected[input.location == loc] { (loc) }
                            }
                        }
                    }
                    (number_field("bedrooms", "Bedrooms", input.bedrooms, 1, 10))
                    (number_field("bathrooms", "Bathrooms", input.bathrooms, 1, 10))
                    (number_field("size", "Size (sqm)", input.size_sqm, 20, 2000))
                    (number_field("amenity_score", "Amenity Score", input.amenity_score, 0, 30))
                    button type="submit" { "Predict Price" }
                }

                @if let Some(p) = vm.prediction {
                    (card("Prediction Result", html! {
                        p { "Predicted Price: " strong { "KES " (thousands(p.price)) } }
                        p { "Estimated Range: KES " (thousands(p.lower)) " - KES " (thousands(p.upper)) }
                    }))

                    (card("Price Drivers", html! {
                        p {
                            "The prediction is primarily influenced by property size, "
                            "location, number of bedrooms/bathrooms, and amenity score. "
                            "Premium locations and larger sizes typically increase price."
                        }
                    }))
                }
            }
        },
    )
}

fn number_field(name: &str, label: &str, value: u32, min: u32, max: u32) -> Markup {
    html! {
        p {
            label for=(name) { (label) " " }
            input type="number" id=(name) name=(name) value=(value) min=(min) max=(max);
        }
    }
}
