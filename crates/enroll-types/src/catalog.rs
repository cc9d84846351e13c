//! Fixed option lists backing the sign-up forms. Records store the raw
//! `value`; labels are presentation-only.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const REGIONS: &[CatalogOption] = &[
    CatalogOption { value: "region1", label: "Yerevan" },
    CatalogOption { value: "region2", label: "Shirak" },
    CatalogOption { value: "region3", label: "Lori" },
    CatalogOption { value: "region4", label: "Tavush" },
    CatalogOption { value: "region5", label: "Aragatsotn" },
];

pub const CITIES: &[CatalogOption] = &[
    CatalogOption { value: "city1", label: "Yerevan" },
    CatalogOption { value: "city2", label: "Gyumri" },
    CatalogOption { value: "city3", label: "Vanadzor" },
    CatalogOption { value: "city4", label: "Ijevan" },
    CatalogOption { value: "city5", label: "Ashtarak" },
];

pub const SCHOOLS: &[CatalogOption] = &[
    CatalogOption { value: "school1", label: "Yerevan State University" },
    CatalogOption { value: "school2", label: "American University of Armenia" },
    CatalogOption { value: "school3", label: "Russian-Armenian University" },
    CatalogOption {
        value: "school4",
        label: "Yerevan Brusov State University of Languages and Social Sciences",
    },
    CatalogOption { value: "school5", label: "National Polytechnic University of Armenia" },
];

pub const GRADES: &[CatalogOption] = &[
    CatalogOption { value: "grade1", label: "1st Grade" },
    CatalogOption { value: "grade2", label: "2nd Grade" },
    CatalogOption { value: "grade3", label: "3rd Grade" },
    CatalogOption { value: "grade4", label: "4th Grade" },
    CatalogOption { value: "grade5", label: "5th Grade" },
];

pub const COUNTRIES: &[CatalogOption] = &[
    CatalogOption { value: "country1", label: "Armenia" },
    CatalogOption { value: "country2", label: "United States" },
    CatalogOption { value: "country3", label: "Russia" },
    CatalogOption { value: "country4", label: "France" },
    CatalogOption { value: "country5", label: "Germany" },
];
