use wasm_bindgen::prelude::*;

mod experience;
use experience::GreetingExperience;

glimmer_web::export_experience!(GreetingExperience, "birthday-greeting");
