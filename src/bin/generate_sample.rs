use anyhow::{Context, Result};

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Emily", "David", "Sarah", "Robert", "Lisa", "William",
    "Jennifer", "James", "Mary", "Daniel", "Linda", "Matthew", "Barbara", "Anthony", "Susan",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Wilson", "Anderson", "Taylor", "Moore", "Jackson", "Lee", "Nguyen", "Clark",
];
const DEPARTMENTS: &[&str] = &[
    "Engineering", "Sales", "Marketing", "HR", "Finance", "Operations",
    "Customer Support", "Product", "Legal", "IT",
];
const LOCATIONS: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "San Jose", "Austin", "Seattle", "Denver", "Boston", "Portland",
    "Atlanta", "Miami", "Detroit",
];
const JOB_LEVELS: &[&str] = &["Junior", "Mid-Level", "Senior", "Lead", "Manager", "Director"];
const SATISFACTION: &[&str] = &[
    "Very Satisfied", "Satisfied", "Neutral", "Dissatisfied", "Very Dissatisfied",
];
const WORK_LIFE: &[&str] = &["Excellent", "Good", "Fair", "Poor"];
const BENEFITS: &[&str] = &["Excellent", "Good", "Average", "Below Average", "Poor"];
const RECOMMEND: &[&str] = &[
    "Definitely", "Probably", "Not Sure", "Probably Not", "Definitely Not",
];
const TENURE: &[&str] = &["< 1 year", "1-2 years", "2-5 years", "5-10 years", "10+ years"];
const REMOTE: &[&str] = &[
    "Fully Remote", "Hybrid (3 days office)", "Hybrid (2 days office)", "Mostly Office",
    "Fully Office",
];
const FEEDBACK_POSITIVE: &[&str] = &[
    "Great team collaboration and culture",
    "Good work-life balance",
    "Competitive salary and benefits",
    "Interesting and challenging projects",
    "Flexible working hours",
];
const FEEDBACK_CONSTRUCTIVE: &[&str] = &[
    "Could improve communication between teams",
    "Would like more training opportunities",
    "Workload can be overwhelming at times",
    "Salary not competitive with market",
    "Unclear performance evaluation process",
];

const COLUMNS: &[&str] = &[
    "Employee_ID", "Name", "Age", "Department", "Location", "Job_Level", "Tenure",
    "Overall_Satisfaction", "Work_Life_Balance", "Benefits_Rating", "Would_Recommend",
    "Remote_Preference", "Survey_Date", "Feedback",
];

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

    fn range(&mut self, lo: u64, hi_inclusive: u64) -> u64 {
        lo + self.next_u64() % (hi_inclusive - lo + 1)
    }

    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.next_u64() as usize % items.len()]
    }

    /// Pick with the given relative weights (same length as `items`).
    fn choose_weighted<'a>(&mut self, items: &[&'a str], weights: &[f64]) -> &'a str {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (item, w) in items.iter().zip(weights) {
            if target < *w {
                return *item;
            }
            target -= w;
        }
        items[items.len() - 1]
    }
}

/// Day-of-year offset in Q1 2024 → ISO date.
fn q1_2024_date(day: u64) -> String {
    let (month, day) = match day {
        0..=30 => (1, day + 1),
        31..=59 => (2, day - 30),
        _ => (3, day - 59),
    };
    format!("2024-{month:02}-{day:02}")
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_survey.csv";
    let n_rows = 1000;

    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(COLUMNS)?;

    for i in 1..=n_rows {
        let job_level = rng.choose(JOB_LEVELS);
        let department = rng.choose(DEPARTMENTS);

        let senior = matches!(job_level, "Manager" | "Director" | "Lead");
        let satisfaction_weights: &[f64] = if senior {
            &[0.35, 0.30, 0.20, 0.10, 0.05]
        } else {
            &[0.15, 0.25, 0.30, 0.20, 0.10]
        };
        let satisfaction = rng.choose_weighted(SATISFACTION, satisfaction_weights);

        let wlb_weights: &[f64] = if matches!(department, "Sales" | "Operations") {
            &[0.10, 0.30, 0.40, 0.20]
        } else {
            &[0.25, 0.40, 0.25, 0.10]
        };
        let work_life = rng.choose_weighted(WORK_LIFE, wlb_weights);

        let happy = matches!(satisfaction, "Very Satisfied" | "Satisfied");
        let recommend_weights: &[f64] = if happy {
            &[0.40, 0.35, 0.15, 0.07, 0.03]
        } else if satisfaction == "Neutral" {
            &[0.10, 0.25, 0.40, 0.15, 0.10]
        } else {
            &[0.05, 0.10, 0.20, 0.35, 0.30]
        };
        let recommend = rng.choose_weighted(RECOMMEND, recommend_weights);

        let feedback = if happy {
            rng.choose(FEEDBACK_POSITIVE)
        } else {
            rng.choose(FEEDBACK_CONSTRUCTIVE)
        };

        let record = [
            format!("EMP{i:04}"),
            format!("{} {}", rng.choose(FIRST_NAMES), rng.choose(LAST_NAMES)),
            rng.range(22, 65).to_string(),
            department.to_string(),
            rng.choose(LOCATIONS).to_string(),
            job_level.to_string(),
            rng.choose(TENURE).to_string(),
            satisfaction.to_string(),
            work_life.to_string(),
            rng.choose(BENEFITS).to_string(),
            recommend.to_string(),
            rng.choose(REMOTE).to_string(),
            q1_2024_date(rng.range(0, 89)),
            feedback.to_string(),
        ];
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} survey responses to {output_path}");
    Ok(())
}
