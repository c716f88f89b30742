use crate::models::{ClinicalTrial, Expert, Publication};
use lazy_static::lazy_static;

// Static fallback catalog. Served whenever a registry fetch fails so the
// browsing pages always have content.

lazy_static! {
    static ref SEED_TRIALS: Vec<ClinicalTrial> = vec![
        ClinicalTrial {
            id: "trial-1".to_string(),
            title: "A Study of a New Immunotherapy for Advanced Brain Cancer".to_string(),
            status: "Recruiting".to_string(),
            location: "New York, NY".to_string(),
            details: "This is a phase II clinical trial to evaluate the efficacy and safety of a novel immunotherapy agent in patients with recurrent glioblastoma. Participants must have a confirmed diagnosis of glioblastoma and have previously received standard radiation and chemotherapy. The primary outcome measure is overall survival.".to_string(),
            contact_email: "brain-cancer-trial@example.com".to_string(),
            keywords: vec![
                "Brain Cancer".to_string(),
                "Immunotherapy".to_string(),
                "Glioblastoma".to_string(),
            ],
        },
        ClinicalTrial {
            id: "trial-2".to_string(),
            title: "Gene Therapy for Early-Stage Alzheimer's Disease".to_string(),
            status: "Not yet recruiting".to_string(),
            location: "San Francisco, CA".to_string(),
            details: "A phase I/II study to assess the safety and potential efficacy of a new gene therapy approach for individuals with early-stage Alzheimer's disease. The study involves a one-time administration of the therapeutic agent. Key inclusion criteria include a diagnosis of mild cognitive impairment or early Alzheimer's and specific biomarker profiles.".to_string(),
            contact_email: "alz-trial@example.com".to_string(),
            keywords: vec![
                "Alzheimer's".to_string(),
                "Gene Therapy".to_string(),
                "Neurology".to_string(),
            ],
        },
        ClinicalTrial {
            id: "trial-3".to_string(),
            title: "Targeted Therapy for KRAS-Mutated Lung Cancer".to_string(),
            status: "Recruiting".to_string(),
            location: "Global".to_string(),
            details: "A global, randomized, phase III trial comparing a new targeted agent against standard-of-care chemotherapy in patients with advanced non-small cell lung cancer (NSCLC) harboring a KRAS G12C mutation. Patients must not have received prior systemic therapy for advanced disease.".to_string(),
            contact_email: "lung-cancer-trial@example.com".to_string(),
            keywords: vec![
                "Lung Cancer".to_string(),
                "Targeted Therapy".to_string(),
                "KRAS".to_string(),
            ],
        },
        ClinicalTrial {
            id: "trial-4".to_string(),
            title: "Completed Study on Beta-blockers for Heart Failure".to_string(),
            status: "Completed".to_string(),
            location: "Chicago, IL".to_string(),
            details: "This large-scale, long-term study evaluated the impact of beta-blocker therapy on morbidity and mortality in patients with chronic heart failure. The results, published in a leading cardiology journal, have helped shape current treatment guidelines. Data analysis is ongoing.".to_string(),
            contact_email: "heart-trial-info@example.com".to_string(),
            keywords: vec![
                "Heart Failure".to_string(),
                "Beta-blockers".to_string(),
                "Cardiology".to_string(),
            ],
        },
    ];

    static ref SEED_PUBLICATIONS: Vec<Publication> = vec![
        Publication {
            id: "pub-1".to_string(),
            title: "Efficacy of CAR-T Cell Therapy in Relapsed Glioblastoma".to_string(),
            authors: vec!["Carter E".to_string(), "Jones M".to_string(), "Lee S".to_string()],
            journal: "New England Journal of Medicine".to_string(),
            year: 2023,
            url: "https://www.nejm.org".to_string(),
            summary: Some("This landmark study demonstrates significant improvement in progression-free survival for patients with relapsed glioblastoma treated with a novel CAR-T cell construct. The therapy was generally well-tolerated, with manageable side effects.".to_string()),
            keywords: vec![
                "Brain Cancer".to_string(),
                "CAR-T".to_string(),
                "Immunotherapy".to_string(),
            ],
        },
        Publication {
            id: "pub-2".to_string(),
            title: "Neuroinflammatory Pathways in Alzheimer's Disease Pathogenesis".to_string(),
            authors: vec!["Adams B".to_string(), "Chen L".to_string()],
            journal: "Nature Neuroscience".to_string(),
            year: 2022,
            url: "https://www.nature.com/neuro/".to_string(),
            summary: Some("This review details the critical role of neuroinflammation in the progression of Alzheimer's disease, highlighting potential new therapeutic targets within microglial activation pathways. It synthesizes findings from genetic, preclinical, and clinical studies.".to_string()),
            keywords: vec!["Alzheimer's".to_string(), "Neuroinflammation".to_string()],
        },
        Publication {
            id: "pub-3".to_string(),
            title: "The Tumor Microenvironment as a Barrier to Immunotherapy".to_string(),
            authors: vec!["Carter E".to_string(), "Rodriguez F".to_string()],
            journal: "Cancer Cell".to_string(),
            year: 2021,
            url: "https://www.cell.com/cancer-cell/home".to_string(),
            summary: Some("This paper explores the complex interplay of cells and signaling molecules within the tumor microenvironment that can suppress anti-tumor immune responses. Strategies to overcome these barriers, such as combination therapies, are discussed.".to_string()),
            keywords: vec![
                "Immunotherapy".to_string(),
                "Tumor Microenvironment".to_string(),
            ],
        },
        Publication {
            id: "pub-4".to_string(),
            title: "Precision Medicine in KRAS-Mutant Lung Cancer".to_string(),
            authors: vec!["Wilson D".to_string(), "Patel A".to_string()],
            journal: "The Lancet Oncology".to_string(),
            year: 2023,
            url: "https://www.thelancet.com/journals/lanonc/home".to_string(),
            summary: Some("A comprehensive overview of the development of targeted therapies for KRAS-mutant lung cancer, focusing on the success of KRAS G12C inhibitors and the ongoing search for therapies for other KRAS mutations.".to_string()),
            keywords: vec![
                "Lung Cancer".to_string(),
                "KRAS".to_string(),
                "Precision Medicine".to_string(),
            ],
        },
    ];

    static ref SEED_EXPERTS: Vec<Expert> = vec![
        Expert {
            id: "researcher-1".to_string(),
            name: "Dr. Emily Carter".to_string(),
            specialties: vec!["Oncology".to_string(), "Immunology".to_string()],
            research_interests: vec![
                "CAR-T cell therapy".to_string(),
                "Cancer vaccines".to_string(),
                "Tumor microenvironment".to_string(),
            ],
            available_for_meetings: true,
        },
        Expert {
            id: "researcher-2".to_string(),
            name: "Dr. Ben Adams".to_string(),
            specialties: vec!["Neurology".to_string(), "Genetics".to_string()],
            research_interests: vec![
                "Alzheimer's disease".to_string(),
                "Neuroinflammation".to_string(),
                "Gene therapy".to_string(),
            ],
            available_for_meetings: false,
        },
        Expert {
            id: "researcher-3".to_string(),
            name: "Dr. Chloe Davis".to_string(),
            specialties: vec!["Cardiology".to_string()],
            research_interests: vec![
                "Heart failure".to_string(),
                "Arrhythmia".to_string(),
                "Cardiac imaging".to_string(),
            ],
            available_for_meetings: true,
        },
        Expert {
            id: "researcher-4".to_string(),
            name: "Dr. David Wilson".to_string(),
            specialties: vec!["Oncology".to_string(), "Genetics".to_string()],
            research_interests: vec![
                "Lung Cancer".to_string(),
                "Targeted Therapy".to_string(),
                "Precision Medicine".to_string(),
            ],
            available_for_meetings: false,
        },
    ];
}

pub fn seed_trials() -> Vec<ClinicalTrial> {
    SEED_TRIALS.clone()
}

pub fn seed_publications() -> Vec<Publication> {
    SEED_PUBLICATIONS.clone()
}

pub fn seed_experts() -> Vec<Expert> {
    SEED_EXPERTS.clone()
}
