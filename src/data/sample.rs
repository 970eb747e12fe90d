use super::model::{Island, Penguin, PenguinDataset, Sex, Species};

// ---------------------------------------------------------------------------
// Bundled dataset
// ---------------------------------------------------------------------------
//
// Used when no data file is configured. Reproduces the palmerpenguins
// composition (344 birds, three study years) with measurements drawn from
// per-species, per-sex normal distributions. Seeded, so every run and every
// session sees the same records.

/// `(island, number of birds)` for each species, in dataset order.
const COMPOSITION: &[(Species, &[(Island, usize)])] = &[
    (
        Species::Adelie,
        &[(Island::Torgersen, 52), (Island::Biscoe, 44), (Island::Dream, 56)],
    ),
    (Species::Gentoo, &[(Island::Biscoe, 124)]),
    (Species::Chinstrap, &[(Island::Dream, 68)]),
];

/// Rows with every measurement and sex missing.
const UNMEASURED: [usize; 2] = [3, 271];

/// Rows with measurements but no recorded sex.
const SEX_UNKNOWN: [usize; 9] = [8, 9, 10, 11, 47, 178, 218, 256, 268];

/// Mean of one measurement as `(female, male, standard deviation)`.
struct Trait(f64, f64, f64);

struct Profile {
    bill_length: Trait,
    bill_depth: Trait,
    flipper_length: Trait,
    body_mass: Trait,
}

fn profile(species: Species) -> Profile {
    match species {
        Species::Adelie => Profile {
            bill_length: Trait(37.3, 40.4, 2.0),
            bill_depth: Trait(17.6, 19.1, 0.9),
            flipper_length: Trait(187.8, 192.4, 6.0),
            body_mass: Trait(3369.0, 4043.0, 300.0),
        },
        Species::Chinstrap => Profile {
            bill_length: Trait(46.6, 51.1, 3.0),
            bill_depth: Trait(17.6, 19.3, 0.8),
            flipper_length: Trait(191.7, 199.9, 6.0),
            body_mass: Trait(3527.0, 3939.0, 300.0),
        },
        Species::Gentoo => Profile {
            bill_length: Trait(45.6, 49.5, 2.5),
            bill_depth: Trait(14.2, 15.7, 0.6),
            flipper_length: Trait(212.7, 221.5, 5.0),
            body_mass: Trait(4680.0, 5485.0, 300.0),
        },
    }
}

/// Build the bundled 344-record dataset.
pub fn bundled_dataset() -> PenguinDataset {
    let mut rng = SimpleRng::new(42);
    let mut records = Vec::with_capacity(344);

    for &(species, islands) in COMPOSITION {
        let p = profile(species);
        for &(island, count) in islands {
            for i in 0..count {
                let row = records.len();
                // Each island colony was visited in all three years.
                let year = 2007 + (i * 3 / count) as i32;
                let sex = if i % 2 == 0 { Sex::Male } else { Sex::Female };

                let mut draw = |t: &Trait, step: f64| {
                    let mean = if sex == Sex::Male { t.1 } else { t.0 };
                    quantize(rng.gauss(mean, t.2), step)
                };
                let bill_length_mm = draw(&p.bill_length, 0.1);
                let bill_depth_mm = draw(&p.bill_depth, 0.1);
                let flipper_length_mm = draw(&p.flipper_length, 1.0);
                let body_mass_g = draw(&p.body_mass, 25.0);

                let penguin = if UNMEASURED.contains(&row) {
                    Penguin {
                        species,
                        island,
                        bill_length_mm: None,
                        bill_depth_mm: None,
                        flipper_length_mm: None,
                        body_mass_g: None,
                        sex: None,
                        year,
                    }
                } else {
                    Penguin {
                        species,
                        island,
                        bill_length_mm: Some(bill_length_mm),
                        bill_depth_mm: Some(bill_depth_mm),
                        flipper_length_mm: Some(flipper_length_mm),
                        body_mass_g: Some(body_mass_g),
                        sex: (!SEX_UNKNOWN.contains(&row)).then_some(sex),
                        year,
                    }
                };
                records.push(penguin);
            }
        }
    }

    PenguinDataset::new(records)
}

/// Round to a multiple of `step`. Sub-unit steps divide by an exact
/// integer so the result matches what parsing the printed decimal gives.
fn quantize(x: f64, step: f64) -> f64 {
    if step >= 1.0 {
        (x / step).round() * step
    } else {
        let per_unit = (1.0 / step).round();
        (x * per_unit).round() / per_unit
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}
