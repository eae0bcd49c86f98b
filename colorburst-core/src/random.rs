use rand::Rng;

pub fn random_in_range(min: f64, max: f64) -> f64 {
    random_in_range_with(&mut rand::rng(), min, max)
}

pub fn random_in_range_with<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..max)
}
