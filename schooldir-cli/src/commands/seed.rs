//! Seed the directory with sample schools
//!
//! Provisions the database and table if needed, empties the table and
//! inserts a fixed set of rows.

use anyhow::{Context, Result};
use clap::Parser;
use schooldir_server::db::SchoolStore;
use schooldir_server::models::{NewSchool, SchoolForm};

use super::repo_from_env;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Insert without emptying the table first
    #[arg(long)]
    pub keep_existing: bool,
}

/// name, address, city, state, contact, email, imagePath
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const SAMPLES: [SampleRow; 10] = [
    ("Green Valley High", "123 Park Ave", "Delhi", "Delhi", "9999999999", "gvh@example.com", "/schoolImages/Img1.webp"),
    ("Blue Ridge Public", "45 Lake Road", "Mumbai", "Maharashtra", "8888888888", "brp@example.com", "/schoolImages/Img2.webp"),
    ("Sunrise Academy", "9 Hill Street", "Pune", "Maharashtra", "7777777777", "sa@example.com", "/schoolImages/Img3.jpg"),
    ("Silver Oak International", "78 Elm Street", "Bengaluru", "Karnataka", "6666666666", "soi@example.com", "/schoolImages/Img4.jpg"),
    ("Lotus Valley School", "22 MG Road", "Gurgaon", "Haryana", "9555555555", "lvs@example.com", "/schoolImages/Img5.webp"),
    ("Heritage Public School", "5 River Lane", "Chennai", "Tamil Nadu", "9444444444", "hps@example.com", "/schoolImages/Img6.webp"),
    ("Bright Future Academy", "14 Lake View", "Kolkata", "West Bengal", "9333333333", "bfa@example.com", "/schoolImages/Img7.webp"),
    ("Royal Kids Academy", "9 Palace Road", "Jaipur", "Rajasthan", "9222222222", "rka@example.com", "/schoolImages/Img8.webp"),
    ("Future Minds School", "3 Tech Park", "Hyderabad", "Telangana", "9111111111", "fms@example.com", "/schoolImages/Img9.webp"),
    ("National Star School", "17 Freedom Street", "Lucknow", "Uttar Pradesh", "9000000000", "nss@example.com", "/schoolImages/Img10.webp"),
];

fn sample_schools() -> Result<Vec<(NewSchool, &'static str)>> {
    SAMPLES
        .iter()
        .map(|&(name, address, city, state, contact, email, image)| {
            let school = NewSchool::from_form(SchoolForm {
                name: name.into(),
                address: address.into(),
                city: city.into(),
                state: state.into(),
                contact: contact.into(),
                email: email.into(),
            })
            .with_context(|| format!("Invalid sample school '{}'", name))?;
            Ok((school, image))
        })
        .collect()
}

/// Run the seed command
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let repo = repo_from_env()?;
    let samples = sample_schools()?;

    repo.ensure_schema()
        .await
        .context("Failed to provision schema")?;

    if !args.keep_existing {
        repo.truncate().await.context("Failed to empty schools table")?;
    }

    for (school, image) in &samples {
        repo.insert(school, Some(*image))
            .await
            .with_context(|| format!("Failed to insert '{}'", school.name()))?;
    }

    tracing::info!(count = samples.len(), "Inserted sample schools");
    repo.database().close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_valid_and_unique() {
        let samples = sample_schools().unwrap();
        assert_eq!(samples.len(), 10);

        let mut contacts: Vec<_> = samples.iter().map(|(s, _)| s.contact()).collect();
        contacts.sort_unstable();
        contacts.dedup();
        assert_eq!(contacts.len(), 10);

        let mut emails: Vec<_> = samples.iter().map(|(s, _)| s.email()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), 10);
    }
}
