use anyhow::Result;

use crate::support::{form, today, FixturePlaces};
use crate::IntegrationHarness;

const SAN_JOSE: FixturePlaces = FixturePlaces {
    zip_code: "95112",
    country: "US",
};

#[test]
fn nearby_resources_use_the_profile_zip() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness.session("nearby").with_places(Box::new(SAN_JOSE));
    session.onboard(form(), None, today())?;

    let nearby = session.nearby_resources()?;
    assert_eq!(nearby.food_banks.len(), 1);
    assert_eq!(nearby.food_banks[0].name, "Nearest food bank");
    assert_eq!(nearby.food_banks[0].distance, "1.4 mi");
    assert_eq!(nearby.shelters[0].name, "Nearest homeless shelter");
    assert_eq!(nearby.health_centers[0].name, "Nearest FQHC community health center");

    let all = session.location_resources()?;
    assert_eq!(all.legal_aid[0].name, "Nearest free legal aid");
    assert_eq!(all.clothing.len(), 1);

    let counseling = session.mental_health_resources()?;
    assert_eq!(counseling[0].name, "Nearest youth mental health counseling");
    Ok(())
}

#[test]
fn lookups_outside_the_us_are_empty() -> Result<()> {
    let harness = IntegrationHarness::new();
    let places = FixturePlaces {
        zip_code: "95112",
        country: "MX",
    };
    let mut session = harness.session("abroad").with_places(Box::new(places));
    session.onboard(form(), None, today())?;

    let all = session.location_resources()?;
    assert!(all.food_banks.is_empty());
    assert!(all.legal_aid.is_empty());
    assert!(session.mental_health_resources()?.is_empty());
    Ok(())
}

#[test]
fn unknown_zip_yields_no_resources() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness.session("elsewhere").with_places(Box::new(SAN_JOSE));
    let mut other = form();
    other.zip_code = "10001".into();
    session.onboard(other, None, today())?;

    let nearby = session.nearby_resources()?;
    assert!(nearby.food_banks.is_empty());
    assert!(nearby.shelters.is_empty());
    Ok(())
}

#[test]
fn lookups_need_places_and_a_profile() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness.session("no-maps");
    assert!(session.nearby_resources().is_err());
    session.onboard(form(), None, today())?;
    let err = session.nearby_resources().unwrap_err();
    assert!(err.to_string().contains("maps API key"));
    Ok(())
}
