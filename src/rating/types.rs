use std::collections::HashMap;

use crate::domain::PlayerId;

pub type RatingValue = f64;
pub type RatingMap = HashMap<PlayerId, RatingValue>;
