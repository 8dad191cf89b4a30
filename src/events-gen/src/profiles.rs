use common::config;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::error::EventsGenError;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile<'a> {
    pub country: &'a str,
    pub device: &'a str,
}

/// Samples user attributes: country by weight, device uniformly.
pub struct ProfileProvider {
    countries: Vec<String>,
    country_weight_idx: WeightedIndex<u32>,
    devices: Vec<String>,
}

impl ProfileProvider {
    pub fn try_new(countries: &[config::Country], devices: &[String]) -> Result<Self> {
        if devices.is_empty() {
            return Err(EventsGenError::Internal("no devices to sample".to_string()));
        }

        Ok(Self {
            countries: countries.iter().map(|c| c.name.clone()).collect(),
            country_weight_idx: WeightedIndex::new(countries.iter().map(|c| c.weight))
                .map_err(|err| EventsGenError::Internal(err.to_string()))?,
            devices: devices.to_vec(),
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Profile<'_> {
        Profile {
            country: &self.countries[self.country_weight_idx.sample(rng)],
            device: &self.devices[rng.gen_range(0..self.devices.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    #[test]
    fn zero_weight_country_is_never_sampled() {
        let countries = vec![
            config::Country {
                name: "US".to_string(),
                weight: 1,
            },
            config::Country {
                name: "CA".to_string(),
                weight: 0,
            },
        ];
        let prov = ProfileProvider::try_new(&countries, &["web".to_string()]).unwrap();
        let mut rng = StepRng::new(0, 0x9E37_79B9_7F4A_7C15);
        for _ in 0..100 {
            let profile = prov.sample(&mut rng);
            assert_eq!(profile.country, "US");
            assert_eq!(profile.device, "web");
        }
    }

    #[test]
    fn rejects_empty_inputs() {
        assert!(ProfileProvider::try_new(&[], &["web".to_string()]).is_err());
        let countries = vec![config::Country {
            name: "US".to_string(),
            weight: 1,
        }];
        assert!(ProfileProvider::try_new(&countries, &[]).is_err());
    }
}
