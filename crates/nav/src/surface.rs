//! Landing surfaces and navigation affordances per role.

use serde::{Deserialize, Serialize};

use mediboard_core::Role;

/// Icon vocabulary for navigation affordances.
///
/// Keys only; the rendering layer owns the actual glyphs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKey {
    Home,
    Users,
    User,
    FileText,
    DollarSign,
    Calendar,
    Settings,
    Activity,
}

/// One navigation entry: label, icon key, and target path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordance {
    pub label: &'static str,
    pub icon: IconKey,
    pub path: &'static str,
}

const fn entry(label: &'static str, icon: IconKey, path: &'static str) -> Affordance {
    Affordance { label, icon, path }
}

/// Default landing surface for a role.
pub fn default_landing(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::Doctor => "/doctor/dashboard",
        Role::Patient => "/patient/dashboard",
    }
}

const ADMIN_AFFORDANCES: [Affordance; 6] = [
    entry("Patients", IconKey::Users, "/admin/patients/add"),
    entry("Staff", IconKey::User, "/admin/staff"),
    entry("Appointments", IconKey::Calendar, "/admin/appointments"),
    entry("Billing", IconKey::DollarSign, "/admin/billing"),
    entry("Reports", IconKey::FileText, "/admin/reports"),
    entry("Settings", IconKey::Settings, "/admin/settings"),
];

const DOCTOR_AFFORDANCES: [Affordance; 4] = [
    entry("My Patients", IconKey::Users, "/doctor/patients"),
    entry("Medical Records", IconKey::FileText, "/doctor/records"),
    entry("Appointments", IconKey::Calendar, "/doctor/appointments"),
    entry("Reports", IconKey::Activity, "/doctor/reports"),
];

const PATIENT_AFFORDANCES: [Affordance; 4] = [
    entry("My Records", IconKey::FileText, "/patient/records"),
    entry("Appointments", IconKey::Calendar, "/patient/appointments"),
    entry("Prescriptions", IconKey::FileText, "/patient/prescriptions"),
    entry("Billing", IconKey::DollarSign, "/patient/billing"),
];

/// Ordered navigation affordances visible to a role.
///
/// Every role's sequence opens with a common `Dashboard` entry pointing at
/// [`default_landing`], followed by the role's fixed table.
pub fn affordances(role: Role) -> Vec<Affordance> {
    let dashboard = entry("Dashboard", IconKey::Home, default_landing(role));
    let table: &[Affordance] = match role {
        Role::Admin => &ADMIN_AFFORDANCES,
        Role::Doctor => &DOCTOR_AFFORDANCES,
        Role::Patient => &PATIENT_AFFORDANCES,
    };

    let mut entries = Vec::with_capacity(1 + table.len());
    entries.push(dashboard);
    entries.extend_from_slice(table);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_lands_on_its_own_dashboard() {
        assert_eq!(default_landing(Role::Admin), "/admin/dashboard");
        assert_eq!(default_landing(Role::Doctor), "/doctor/dashboard");
        assert_eq!(default_landing(Role::Patient), "/patient/dashboard");
    }

    #[test]
    fn affordances_open_with_the_dashboard_entry() {
        for role in Role::ALL {
            let entries = affordances(role);
            let first = entries.first().expect("non-empty");
            assert_eq!(first.label, "Dashboard");
            assert_eq!(first.icon, IconKey::Home);
            assert_eq!(first.path, default_landing(role));
        }
    }

    #[test]
    fn affordances_are_stable_across_calls() {
        for role in Role::ALL {
            assert_eq!(affordances(role), affordances(role));
        }
    }

    #[test]
    fn role_tables_match_the_declared_surfaces() {
        let admin: Vec<&str> = affordances(Role::Admin).iter().map(|a| a.label).collect();
        assert_eq!(
            admin,
            [
                "Dashboard",
                "Patients",
                "Staff",
                "Appointments",
                "Billing",
                "Reports",
                "Settings"
            ]
        );

        let doctor: Vec<&str> = affordances(Role::Doctor).iter().map(|a| a.label).collect();
        assert_eq!(
            doctor,
            [
                "Dashboard",
                "My Patients",
                "Medical Records",
                "Appointments",
                "Reports"
            ]
        );

        let patient: Vec<&str> = affordances(Role::Patient).iter().map(|a| a.label).collect();
        assert_eq!(
            patient,
            [
                "Dashboard",
                "My Records",
                "Appointments",
                "Prescriptions",
                "Billing"
            ]
        );
    }

    #[test]
    fn paths_stay_inside_the_role_prefix() {
        for role in Role::ALL {
            let prefix = format!("/{}/", role.as_str());
            for affordance in affordances(role) {
                assert!(
                    affordance.path.starts_with(&prefix),
                    "{} escapes {}",
                    affordance.path,
                    prefix
                );
            }
        }
    }
}
