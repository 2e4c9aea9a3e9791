pub mod congestion_sections;
pub mod road_traffic_overall;
