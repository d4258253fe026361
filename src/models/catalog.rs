// Fixed lookup table from classifier class ids to display names and reference images

/// Display data for one pose class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseInfo {
    pub class_id: i64,
    pub name: &'static str,
    pub image: &'static str,
}

/// Shown when the class id is not in the catalog
pub const FALLBACK_POSE_IMAGE: &str = "https://images.unsplash.com/photo-1506126613408-eca07ce68773";

pub const POSE_CATALOG: [PoseInfo; 13] = [
    PoseInfo { class_id: 1, name: "Vrikshasana", image: "/poses/1.jpeg" },
    PoseInfo { class_id: 2, name: "Virabhadrasana", image: "/poses/2.jpeg" },
    PoseInfo { class_id: 3, name: "Utkatasana", image: "/poses/3.png" },
    PoseInfo { class_id: 4, name: "Trikonasana", image: "/poses/4.png" },
    PoseInfo { class_id: 5, name: "Tadasana", image: "/poses/5.png" },
    PoseInfo { class_id: 6, name: "Sarvangasana", image: "/poses/6.png" },
    PoseInfo { class_id: 7, name: "Prasarita Padottanasana", image: "/poses/7.png" },
    PoseInfo { class_id: 8, name: "Garudasana", image: "/poses/8.png" },
    PoseInfo { class_id: 9, name: "Natarajasana", image: "/poses/9.jpeg" },
    PoseInfo { class_id: 10, name: "Halasana", image: "/poses/10.png" },
    PoseInfo { class_id: 11, name: "Dhanurasana", image: "/poses/11.jpeg" },
    PoseInfo { class_id: 12, name: "Bhujangasana", image: "/poses/12.png" },
    PoseInfo { class_id: 13, name: "Ardha Matsyendrasana", image: "/poses/13.png" },
];

pub fn lookup(class_id: i64) -> Option<&'static PoseInfo> {
    POSE_CATALOG.iter().find(|info| info.class_id == class_id)
}

/// Reference image for a class, falling back to the generic picture
pub fn image_for(class_id: i64) -> &'static str {
    lookup(class_id).map(|info| info.image).unwrap_or(FALLBACK_POSE_IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_class() {
        let info = lookup(5).expect("class 5 should exist");
        assert_eq!(info.name, "Tadasana");
        assert_eq!(info.image, "/poses/5.png");
        assert_eq!(lookup(13).unwrap().name, "Ardha Matsyendrasana");
    }

    #[test]
    fn test_unknown_class_uses_fallback_image() {
        assert!(lookup(0).is_none());
        assert!(lookup(14).is_none());
        assert_eq!(image_for(42), FALLBACK_POSE_IMAGE);
        assert_eq!(image_for(9), "/poses/9.jpeg");
    }

    #[test]
    fn test_catalog_ids_are_sequential() {
        for (index, info) in POSE_CATALOG.iter().enumerate() {
            assert_eq!(info.class_id, index as i64 + 1);
        }
    }
}
