//! Built-in sector catalog, used when no `SECTORS_PATH` file is configured.

use crate::taxonomy::Sector;

/// (id, English name, Arabic name, cultural keywords)
const BUILTIN_SECTORS: &[(&str, &str, &str, &[&str])] = &[
    (
        "oil-gas",
        "Oil & Gas",
        "النفط والغاز",
        &["aramco", "hse", "nebosh", "iosh", "osha", "gcc"],
    ),
    (
        "banking-finance",
        "Banking & Finance",
        "البنوك والمالية",
        &["sama", "islamic finance", "aml", "cma", "ifrs"],
    ),
    (
        "healthcare",
        "Healthcare",
        "الرعاية الصحية",
        &["moh", "cbahi", "jci", "scfhs"],
    ),
    (
        "government",
        "Government & Public Sector",
        "القطاع الحكومي",
        &["vision 2030", "public sector", "dga", "nca"],
    ),
    (
        "technology",
        "Technology",
        "التقنية",
        &["arabization", "localization", "nca", "sdaia"],
    ),
    (
        "education",
        "Education",
        "التعليم",
        &["etec", "moe", "curriculum", "tvtc"],
    ),
    (
        "retail",
        "Retail",
        "التجزئة",
        &["saudization", "customer service", "gcc"],
    ),
    (
        "hospitality-tourism",
        "Hospitality & Tourism",
        "الضيافة والسياحة",
        &["hajj", "umrah", "tourism", "hospitality"],
    ),
    (
        "construction",
        "Construction & Real Estate",
        "الإنشاءات والعقارات",
        &["hse", "saudi building code", "pmp"],
    ),
    (
        "manufacturing",
        "Manufacturing",
        "التصنيع",
        &["lean", "iso 9001", "six sigma", "modon"],
    ),
    (
        "telecommunications",
        "Telecommunications",
        "الاتصالات",
        &["cst", "citc", "5g"],
    ),
    (
        "logistics",
        "Logistics & Supply Chain",
        "الخدمات اللوجستية وسلاسل الإمداد",
        &["customs", "zatca", "supply chain"],
    ),
];

pub fn builtin_sectors() -> Vec<Sector> {
    BUILTIN_SECTORS
        .iter()
        .map(|(id, en, ar, keywords)| Sector {
            id: (*id).to_string(),
            display_name_english: (*en).to_string(),
            display_name_arabic: (*ar).to_string(),
            cultural_keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        })
        .collect()
}
