use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Courses {
    Table,
    Id,
    Name,
    Location,
    City,
    State,
    Holes,
    Par,
    Amenities,
    Website,
    PhoneNumber,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum TeeSets {
    Table,
    Id,
    CourseId,
    Name,
    Color,
    Rating,
    Slope,
    Par,
    Distance,
}

#[derive(DeriveIden)]
pub(crate) enum Holes {
    Table,
    Id,
    CourseId,
    HoleNumber,
    Par,
    HandicapIndex,
    Notes,
}

#[derive(DeriveIden)]
pub(crate) enum TeeSetDistances {
    Table,
    Id,
    HoleId,
    TeeSetId,
    Length,
}

#[derive(DeriveIden)]
pub(crate) enum Series {
    Table,
    Id,
    Name,
    Description,
    StartDate,
    EndDate,
    Status,
}

#[derive(DeriveIden)]
pub(crate) enum Events {
    Table,
    Id,
    SeriesId,
    CourseId,
    Name,
    EventDate,
    Status,
}

#[derive(DeriveIden)]
pub(crate) enum SeriesParticipants {
    Table,
    Id,
    SeriesId,
    UserId,
    Status,
    JoinedAt,
}

#[derive(DeriveIden)]
pub(crate) enum EventParticipants {
    Table,
    Id,
    EventId,
    UserId,
    Status,
    JoinedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Profiles {
    Table,
    Id,
    Username,
    FullName,
    Handicap,
    HomeCourseId,
}

#[derive(DeriveIden)]
pub(crate) enum Clubs {
    Table,
    Id,
    UserId,
    Name,
    ClubType,
    Brand,
    ModelName,
    Loft,
}

#[derive(DeriveIden)]
pub(crate) enum Bags {
    Table,
    Id,
    UserId,
    Name,
    Brand,
    ModelName,
    IsPrimary,
}

#[derive(DeriveIden)]
pub(crate) enum BagClubs {
    Table,
    BagId,
    ClubId,
}
