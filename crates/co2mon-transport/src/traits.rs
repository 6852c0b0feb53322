use crate::error::Result;

/// A device that accepts HID "set feature report" control transfers.
///
/// The first byte of `report` is the report ID (0 for devices that do not
/// number their reports); the rest is the report payload.
pub trait FeatureReport {
    fn send_feature_report(&mut self, report: &[u8]) -> Result<()>;
}

impl<T: FeatureReport + ?Sized> FeatureReport for &mut T {
    fn send_feature_report(&mut self, report: &[u8]) -> Result<()> {
        (**self).send_feature_report(report)
    }
}

impl<T: FeatureReport + ?Sized> FeatureReport for Box<T> {
    fn send_feature_report(&mut self, report: &[u8]) -> Result<()> {
        (**self).send_feature_report(report)
    }
}
