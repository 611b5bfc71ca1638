//
//  wwt-api-client
//  communities/enums.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Enumerations used by the Communities service, with their wire strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = concat!("`", $wire, "`")]
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the string used on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {} value: {other:?}",
                        stringify!($name)
                    )),
                }
            }
        }
    };
}

wire_enum! {
    /// Community and content categories.
    pub enum CategoryType {
        All => "All",
        SolidEarth => "SolidEarth",
        AncientEarth => "AncientEarth",
        Atmosphere => "Atmosphere",
        Climate => "Climate",
        Astronomy => "Astronomy",
        OceansRivers => "OceansRivers",
        ColdRegions => "ColdRegions",
        Planets => "Planets",
        GeneralInterest => "GeneralInterest",
        HowTo => "HowTo",
        LifeScience => "LifeScience",
        EarthScience => "EarthScience",
        Nebula => "Nebula",
        Galaxies => "Galaxies",
        Surveys => "Surveys",
        BlackHoles => "BlackHoles",
        Supernova => "Supernova",
        StarClusters => "StarClusters",
        Mars => "Mars",
        Other => "Other",
        Wwt => "WWT",
        CosmicEvents => "CosmicEvents",
        Educators => "Educators",
    }
}

wire_enum! {
    /// Kinds of community.
    pub enum CommunityType {
        None => "None",
        Community => "Community",
        Folder => "Folder",
        User => "User",
    }
}

wire_enum! {
    /// Kinds of content file.
    pub enum ContentType {
        All => "All",
        None => "None",
        Tours => "Tours",
        Wtml => "Wtml",
        Excel => "Excel",
        Doc => "Doc",
        Ppt => "Ppt",
        Link => "Link",
        Generic => "Generic",
        Wwtl => "Wwtl",
        Video => "Video",
    }
}

wire_enum! {
    /// Kinds of profile entity. Profile queries accept only `Community` and
    /// `Content`.
    pub enum EntityType {
        All => "All",
        Community => "Community",
        Folder => "Folder",
        Content => "Content",
        User => "User",
    }
}

wire_enum! {
    /// Highlight listings.
    pub enum HighlightType {
        None => "",
        Featured => "Featured",
        Latest => "Latest",
        Popular => "Popular",
        Related => "Related",
        MostDownloaded => "MostDownloaded",
    }
}

wire_enum! {
    /// Tabs of the community permissions page.
    pub enum PermissionsTab {
        None => "None",
        Users => "Users",
        Requests => "Requests",
        ProfileRequests => "ProfileRequests",
    }
}

wire_enum! {
    /// Roles a user can hold in a community.
    pub enum UserRole {
        None => "None",
        Visitor => "Visitor",
        Reader => "Reader",
        Contributor => "Contributor",
        Moderator => "Moderator",
        ModeratorInherited => "ModeratorInherited",
        Owner => "Owner",
        SiteAdmin => "SiteAdmin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        assert_eq!(CategoryType::Wwt.as_str(), "WWT");
        assert_eq!(HighlightType::None.as_str(), "");
        assert_eq!(EntityType::Content.to_string(), "Content");
        assert_eq!(UserRole::ALL.len(), 8);
    }

    #[test]
    fn test_parse_round_trips_every_variant() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert!("Nope".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&CommunityType::Folder).unwrap();
        assert_eq!(json, "\"Folder\"");
        let back: ContentType = serde_json::from_str("\"Wtml\"").unwrap();
        assert_eq!(back, ContentType::Wtml);
    }
}
