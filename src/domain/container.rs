//! Container-capacity planning for sea shipments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Dimensions;
use super::rates::{CONTAINER_20FT_CAPACITY_CBM, CONTAINER_40FT_CAPACITY_CBM};

/// How a shipment of identical packages fits into 20 ft and 40 ft
/// containers. A size whose capacity the single package exceeds has both of
/// its fields zeroed and `error` set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerRequirement {
    pub package_cbm: f64,
    pub total_cbm: f64,
    pub packages_per_20ft: u32,
    pub packages_per_40ft: u32,
    pub required_20ft: u32,
    pub required_40ft: u32,
    pub error: Option<ContainerFitError>,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerFitError {
    #[error("package size exceeds container capacity")]
    ExceedsContainerCapacity,
    #[error("package size exceeds 20ft container capacity")]
    Exceeds20ftCapacity,
}

/// Pure capacity math: package volume, shipment volume, and how many
/// containers of each size the carton count needs. Dimensions are meters.
pub fn plan_containers(dimensions: &Dimensions, cartons: u32) -> ContainerRequirement {
    let package_cbm = dimensions.volume();
    let total_cbm = package_cbm * cartons as f64;

    if package_cbm > CONTAINER_40FT_CAPACITY_CBM {
        return ContainerRequirement {
            package_cbm,
            total_cbm,
            packages_per_20ft: 0,
            packages_per_40ft: 0,
            required_20ft: 0,
            required_40ft: 0,
            error: Some(ContainerFitError::ExceedsContainerCapacity),
        };
    }

    let packages_per_40ft = (CONTAINER_40FT_CAPACITY_CBM / package_cbm).floor() as u32;
    let required_40ft = cartons.div_ceil(packages_per_40ft);

    if package_cbm > CONTAINER_20FT_CAPACITY_CBM {
        return ContainerRequirement {
            package_cbm,
            total_cbm,
            packages_per_20ft: 0,
            packages_per_40ft,
            required_20ft: 0,
            required_40ft,
            error: Some(ContainerFitError::Exceeds20ftCapacity),
        };
    }

    let packages_per_20ft = (CONTAINER_20FT_CAPACITY_CBM / package_cbm).floor() as u32;
    let required_20ft = cartons.div_ceil(packages_per_20ft);

    ContainerRequirement {
        package_cbm,
        total_cbm,
        packages_per_20ft,
        packages_per_40ft,
        required_20ft,
        required_40ft,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(length: f64, width: f64, height: f64) -> Dimensions {
        Dimensions {
            length,
            width,
            height,
        }
    }

    #[test]
    fn fits_both_container_sizes() {
        let plan = plan_containers(&dims(2.0, 2.0, 2.0), 10);
        assert_eq!(plan.package_cbm, 8.0);
        assert_eq!(plan.total_cbm, 80.0);
        assert_eq!(plan.packages_per_20ft, 4);
        assert_eq!(plan.packages_per_40ft, 8);
        assert_eq!(plan.required_20ft, 3);
        assert_eq!(plan.required_40ft, 2);
        assert_eq!(plan.error, None);
    }

    #[test]
    fn oversize_for_20ft_still_plans_40ft() {
        // 40 CBM: too big for a 20 ft box, exactly one per 40 ft.
        let plan = plan_containers(&dims(5.0, 4.0, 2.0), 3);
        assert_eq!(plan.packages_per_20ft, 0);
        assert_eq!(plan.required_20ft, 0);
        assert_eq!(plan.packages_per_40ft, 1);
        assert_eq!(plan.required_40ft, 3);
        assert_eq!(plan.error, Some(ContainerFitError::Exceeds20ftCapacity));
    }

    #[test]
    fn oversize_for_everything() {
        let plan = plan_containers(&dims(5.0, 5.0, 3.0), 1);
        assert_eq!(plan.packages_per_20ft, 0);
        assert_eq!(plan.packages_per_40ft, 0);
        assert_eq!(plan.required_20ft, 0);
        assert_eq!(plan.required_40ft, 0);
        assert_eq!(
            plan.error,
            Some(ContainerFitError::ExceedsContainerCapacity)
        );
    }

    #[test]
    fn exact_fit_needs_one_container() {
        // 33 CBM fills a 20 ft container exactly.
        let plan = plan_containers(&dims(5.5, 3.0, 2.0), 1);
        assert_eq!(plan.packages_per_20ft, 1);
        assert_eq!(plan.required_20ft, 1);
        assert_eq!(plan.error, None);
    }
}
