//! Writes a deterministic `Food_Production.csv` in the published dataset's
//! layout, including its rough edges: the misspelled `Packging` header, blank
//! and non-numeric cells, and stated totals that disagree with their stages.

const HEADER: [&str; 12] = [
    "Food product",
    "Land use change",
    "Animal Feed",
    "Farm",
    "Processing",
    "Transport",
    "Packging",
    "Retail",
    "Total_emissions",
    "Freshwater withdrawals per kilogram (liters per kilogram)",
    "Land use per kilogram (m² per kilogram)",
    "Scarcity-weighted water use per kilogram (liters per kilogram)",
];

/// Product, seven stage values, freshwater, land use, scarcity water.
type ProductRow = (&'static str, [f64; 7], f64, f64, f64);

const PRODUCTS: [ProductRow; 16] = [
    ("Beef (beef herd)", [16.3, 1.9, 39.4, 1.3, 0.3, 0.2, 0.2], 1451.2, 326.2, 34732.3),
    ("Lamb & Mutton", [0.5, 2.5, 19.5, 1.1, 0.6, 0.3, 0.2], 1803.2, 369.8, 141925.0),
    ("Cheese", [4.5, 2.3, 13.1, 0.7, 0.1, 0.2, 0.3], 5605.2, 87.8, 180851.9),
    ("Beef (dairy herd)", [0.9, 2.5, 15.7, 1.1, 0.4, 0.3, 0.2], 2714.3, 43.2, 119805.2),
    ("Dark Chocolate", [14.3, 0.0, 3.7, 0.2, 0.1, 0.4, 0.0], 540.5, 68.9, 3920.4),
    ("Coffee", [3.7, 0.0, 10.4, 0.6, 0.1, 1.6, 0.1], 22.2, 21.6, 338.0),
    ("Pig Meat", [1.5, 2.9, 1.7, 0.3, 0.3, 0.3, 0.2], 1795.8, 17.4, 75708.5),
    ("Poultry Meat", [2.5, 1.8, 0.7, 0.4, 0.3, 0.2, 0.2], 370.3, 12.2, 14218.0),
    ("Eggs", [0.7, 2.2, 1.3, 0.0, 0.1, 0.2, 0.0], 577.7, 6.3, 17983.4),
    ("Rice", [0.0, 0.0, 3.6, 0.1, 0.1, 0.1, 0.1], 2248.4, 2.8, 49576.3),
    ("Tofu", [1.0, 0.0, 0.5, 0.8, 0.2, 0.2, 0.3], 149.2, 2.2, 3412.5),
    ("Milk", [0.5, 0.2, 1.5, 0.1, 0.1, 0.1, 0.3], 628.2, 8.9, 19786.2),
    ("Wheat & Rye (Bread)", [0.1, 0.0, 0.8, 0.2, 0.1, 0.1, 0.1], 647.5, 3.9, 11379.8),
    ("Potatoes", [0.0, 0.0, 0.2, 0.0, 0.1, 0.0, 0.0], 59.1, 0.9, 2754.2),
    ("Bananas", [-0.03, 0.0, 0.3, 0.1, 0.3, 0.1, 0.0], 114.5, 1.9, 3005.4),
    ("Nuts", [-2.1, 0.0, 2.1, 0.0, 0.1, 0.1, 0.0], 4133.8, 12.96, 229889.8),
];

/// Minimal deterministic PRNG (xorshift64*)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1) | 1,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative jitter in `[1 - spread, 1 + spread]`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

fn cell(value: f64) -> String {
    format!("{value:.2}")
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "Food_Production.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(HEADER)?;

    for (row_no, (product, stages, water, land, scarcity)) in PRODUCTS.iter().enumerate() {
        // Round before summing so consistent totals match their cells.
        let stages: Vec<f64> = stages
            .iter()
            .map(|s| (s * rng.jitter(0.05) * 100.0).round() / 100.0)
            .collect();
        let stage_sum: f64 = stages.iter().sum();

        // Every fourth total is stale, every fifth is missing.
        let total = if row_no % 5 == 4 {
            String::new()
        } else if row_no % 4 == 3 {
            cell(stage_sum * 1.25)
        } else {
            cell(stage_sum)
        };

        let mut record: Vec<String> = vec![product.to_string()];
        record.extend(stages.iter().map(|s| cell(*s)));
        record.push(total);
        record.push(cell(water * rng.jitter(0.1)));
        // A couple of garbled land-use cells.
        record.push(if row_no % 7 == 6 {
            "n/a".to_string()
        } else {
            cell(land * rng.jitter(0.1))
        });
        record.push(cell(scarcity * rng.jitter(0.1)));

        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Wrote {} products to {output_path}", PRODUCTS.len());
    Ok(())
}
