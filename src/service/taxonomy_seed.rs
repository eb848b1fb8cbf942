//! Default branch / semester / subject catalogue loaded by `seed-subjects`.

pub(crate) const SEMESTER_COUNT: i32 = 8;

const FIRST_SEMESTER: &[&str] = &[
    "Matrices and Calculus",
    "Applied Physics",
    "Engineering Chemistry",
    "C Programming and Data Structures",
    "English for Skill Enhancement",
];

const SECOND_SEMESTER: &[&str] = &[
    "Ordinary Differential Equations and Vector Calculus",
    "Engineering Chemistry",
    "Engineering Mechanics",
    "Python Programming",
    "Engineering Graphics",
];

const FINAL_SEMESTER: &[&str] = &[
    "Project Work",
    "Internship / Industrial Training",
    "Seminar",
];

pub(crate) struct BranchCatalogue {
    pub(crate) name: &'static str,
    /// Index 0 is semester 1.
    pub(crate) semesters: [&'static [&'static str]; 8],
}

pub(crate) const CATALOGUE: &[BranchCatalogue] = &[
    BranchCatalogue {
        name: "Electronics and communication Engineering",
        semesters: [
            FIRST_SEMESTER,
            SECOND_SEMESTER,
            &[
                "Network Theory",
                "Signals and Systems",
                "Electronic Devices and Circuits",
                "Digital System Design",
                "Probability and Random Processes",
            ],
            &[
                "Analog Circuits",
                "Control Systems",
                "Analog Communications",
                "Microprocessors and Microcontrollers",
                "Electromagnetic Fields",
            ],
            &[
                "Digital Communications",
                "VLSI Design",
                "Antennas and Wave Propagation",
                "Embedded Systems",
                "Linear IC Applications",
            ],
            &[
                "Wireless Communication",
                "IoT",
                "Digital Signal Processing",
                "Microwave Engineering",
                "Optical Communication",
            ],
            &[
                "Mobile Communication",
                "Cyber Security Basics",
                "Machine Learning Basics",
                "Open Elective - I",
                "Professional Elective - I",
            ],
            FINAL_SEMESTER,
        ],
    },
    BranchCatalogue {
        name: "Computer science Engineering",
        semesters: [
            FIRST_SEMESTER,
            SECOND_SEMESTER,
            &[
                "Discrete Mathematics",
                "Data Structures",
                "Digital Logic Design",
                "Computer Organization",
                "OOP with Java",
            ],
            &[
                "DBMS",
                "Operating Systems",
                "Design and Analysis of Algorithms",
                "Software Engineering",
                "Probability and Statistics",
            ],
            &[
                "Computer Networks",
                "Web Technologies",
                "Compiler Design",
                "Artificial Intelligence",
                "Machine Learning",
            ],
            &[
                "Cloud Computing",
                "Data Science",
                "Cyber Security",
                "Distributed Systems",
                "Open Elective - I",
            ],
            &[
                "Big Data Analytics",
                "DevOps",
                "Blockchain Basics",
                "Professional Elective - I",
                "Professional Elective - II",
            ],
            FINAL_SEMESTER,
        ],
    },
    BranchCatalogue {
        name: "computer science (AI&ML)",
        semesters: [
            FIRST_SEMESTER,
            SECOND_SEMESTER,
            &[
                "Discrete Mathematics",
                "Data Structures",
                "Digital Logic Design",
                "Computer Organization",
                "OOP with Java",
            ],
            &[
                "DBMS",
                "Operating Systems",
                "Design and Analysis of Algorithms",
                "Probability and Statistics",
                "Foundations of AI",
            ],
            &[
                "Machine Learning",
                "Deep Learning",
                "Computer Vision",
                "Natural Language Processing",
                "Data Mining",
            ],
            &[
                "Reinforcement Learning",
                "Cloud Computing",
                "Big Data Analytics",
                "AI Ethics",
                "Open Elective - I",
            ],
            &[
                "MLOps",
                "Advanced NLP",
                "Advanced Computer Vision",
                "Professional Elective - I",
                "Professional Elective - II",
            ],
            FINAL_SEMESTER,
        ],
    },
    BranchCatalogue {
        name: "Civil Engineering",
        semesters: [
            FIRST_SEMESTER,
            SECOND_SEMESTER,
            &[
                "Surveying",
                "Strength of Materials",
                "Building Materials",
                "Fluid Mechanics",
                "Engineering Geology",
            ],
            &[
                "Concrete Technology",
                "Structural Analysis",
                "Geotechnical Engineering",
                "Hydraulics and Hydraulic Machines",
                "Environmental Engineering",
            ],
            &[
                "Design of RCC Structures",
                "Transportation Engineering",
                "Water Resources Engineering",
                "Steel Structures",
                "Open Elective - I",
            ],
            &[
                "Foundation Engineering",
                "Construction Management",
                "Estimating and Costing",
                "Remote Sensing and GIS",
                "Professional Elective - I",
            ],
            &[
                "Advanced Structural Design",
                "Smart Materials",
                "Green Buildings",
                "Professional Elective - II",
                "Professional Elective - III",
            ],
            FINAL_SEMESTER,
        ],
    },
    BranchCatalogue {
        name: "Mechanical Engineering",
        semesters: [
            FIRST_SEMESTER,
            SECOND_SEMESTER,
            &[
                "Mechanics of Solids",
                "Thermodynamics",
                "Metallurgy and Material Science",
                "Production Technology",
                "Engineering Drawing",
            ],
            &[
                "Kinematics of Machinery",
                "Fluid Mechanics and Hydraulic Machines",
                "IC Engines and Gas Turbines",
                "Instrumentation and Control Systems",
                "Basic Electrical and Electronics Engineering",
            ],
            &[
                "Dynamics of Machinery",
                "Heat Transfer",
                "Machine Design",
                "Manufacturing Processes",
                "Open Elective - I",
            ],
            &[
                "CAD/CAM",
                "Finite Element Methods",
                "Refrigeration and Air Conditioning",
                "Industrial Engineering",
                "Professional Elective - I",
            ],
            &[
                "Robotics",
                "Automobile Engineering",
                "Renewable Energy Systems",
                "Professional Elective - II",
                "Professional Elective - III",
            ],
            FINAL_SEMESTER,
        ],
    },
];
